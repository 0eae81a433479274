/*!
Registry description lookup (spec §4.3).

Grounded in the original implementation's `registry.Registry`: one text
file per ASN at `<base>/data/aut-num/AS<n>`, `key: value` lines, and a
priority of `admin-c` over `as-name` over `descr`, falling back to the
default `"AS<n>"` description when the file is missing or none of those
keys are present. The Go original distributes per-ASN lookups with a
goroutine per ASN; matching that here as one thread per lookup would
spawn thousands of OS threads for a full dn42 graph, so a small worker
pool fed through a [`crossbeam_channel`] is used instead, echoing the
bounded worker-pool idiom the pack's ingester uses for readahead.
*/
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crossbeam_channel::bounded;

use crate::models::Asn;

const WORKERS: usize = 8;

pub struct Registry {
    base_path: PathBuf,
    cache: RwLock<HashMap<u32, String>>,
}

impl Registry {
    pub fn new(base_path: impl Into<PathBuf>) -> Registry {
        Registry {
            base_path: base_path.into(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Resolves descriptions for every ASN in `asns`, process-lifetime
    /// cached, using a small pool of worker threads.
    pub fn describe_all(&self, asns: &[Asn]) -> HashMap<u32, String> {
        let (job_tx, job_rx) = bounded::<u32>(asns.len().max(1));
        let (result_tx, result_rx) = bounded::<(u32, String)>(asns.len().max(1));

        let pending: Vec<u32> = {
            let cache = self.cache.read().unwrap();
            asns.iter()
                .map(|a| a.to_u32())
                .filter(|asn| !cache.contains_key(asn))
                .collect()
        };
        for asn in &pending {
            job_tx.send(*asn).unwrap();
        }
        drop(job_tx);

        std::thread::scope(|scope| {
            for _ in 0..WORKERS.min(pending.len().max(1)) {
                let job_rx = job_rx.clone();
                let result_tx = result_tx.clone();
                scope.spawn(move || {
                    for asn in job_rx {
                        let desc = describe_from_file(&self.base_path, asn);
                        result_tx.send((asn, desc)).unwrap();
                    }
                });
            }
            drop(result_tx);

            let mut cache = self.cache.write().unwrap();
            for (asn, desc) in result_rx {
                cache.insert(asn, desc);
            }
        });

        let cache = self.cache.read().unwrap();
        asns.iter()
            .map(|a| a.to_u32())
            .map(|asn| {
                let desc = cache
                    .get(&asn)
                    .cloned()
                    .unwrap_or_else(|| crate::models::default_description(Asn::new(asn)));
                (asn, desc)
            })
            .collect()
    }

    /// Raw `aut-num` object text for a single ASN, used by the `/asn/<n>`
    /// endpoint's whois field (spec §10 supplement). `None` if no such
    /// file exists.
    pub fn raw_object(&self, asn: Asn) -> Option<String> {
        fs::read_to_string(aut_num_path(&self.base_path, asn.to_u32())).ok()
    }
}

fn aut_num_path(base: &Path, asn: u32) -> PathBuf {
    base.join("data").join("aut-num").join(format!("AS{asn}"))
}

fn describe_from_file(base: &Path, asn: u32) -> String {
    let contents = match fs::read_to_string(aut_num_path(base, asn)) {
        Ok(c) => c,
        Err(_) => return crate::models::default_description(Asn::new(asn)),
    };

    let mut admin_c = None;
    let mut as_name = None;
    let mut descr = None;

    for line in contents.lines() {
        if let Some(v) = line.strip_prefix("admin-c:") {
            admin_c.get_or_insert(v.trim().to_string());
        } else if let Some(v) = line.strip_prefix("as-name:") {
            as_name.get_or_insert(v.trim().to_string());
        } else if let Some(v) = line.strip_prefix("descr:") {
            descr.get_or_insert(v.trim().to_string());
        }
    }

    admin_c
        .or(as_name)
        .or(descr)
        .unwrap_or_else(|| crate::models::default_description(Asn::new(asn)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_aut_num(dir: &Path, asn: u32, body: &str) {
        let path = dir.join("data").join("aut-num");
        fs::create_dir_all(&path).unwrap();
        fs::write(path.join(format!("AS{asn}")), body).unwrap();
    }

    #[test]
    fn admin_c_wins_over_as_name_and_descr() {
        let dir = tempfile::tempdir().unwrap();
        write_aut_num(
            dir.path(),
            65000,
            "as-name: EXAMPLE\ndescr: Example Net\nadmin-c: JOHN-DN42\n",
        );
        let registry = Registry::new(dir.path());
        let map = registry.describe_all(&[Asn::new(65000)]);
        assert_eq!(map.get(&65000).unwrap(), "JOHN-DN42");
    }

    #[test]
    fn falls_back_to_as_name_then_descr() {
        let dir = tempfile::tempdir().unwrap();
        write_aut_num(dir.path(), 65001, "descr: Example Net\n");
        let registry = Registry::new(dir.path());
        let map = registry.describe_all(&[Asn::new(65001)]);
        assert_eq!(map.get(&65001).unwrap(), "Example Net");
    }

    #[test]
    fn missing_file_yields_default_description() {
        let dir = tempfile::tempdir().unwrap();
        let registry = Registry::new(dir.path());
        let map = registry.describe_all(&[Asn::new(65002)]);
        assert_eq!(map.get(&65002).unwrap(), "AS65002");
    }

    #[test]
    fn results_are_cached_across_calls() {
        let dir = tempfile::tempdir().unwrap();
        write_aut_num(dir.path(), 65003, "as-name: FIRST\n");
        let registry = Registry::new(dir.path());
        registry.describe_all(&[Asn::new(65003)]);
        write_aut_num(dir.path(), 65003, "as-name: SECOND\n");
        let map = registry.describe_all(&[Asn::new(65003)]);
        assert_eq!(map.get(&65003).unwrap(), "FIRST");
    }
}
