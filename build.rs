fn main() {
    prost_build::compile_protos(&["proto/dn42_map.proto"], &["proto/"])
        .expect("failed to compile dn42_map.proto");
    println!("cargo:rerun-if-changed=proto/dn42_map.proto");
}
