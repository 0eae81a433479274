/*!
The end-to-end generation pipeline (spec §4, §7 "Lifecycle").

Grounded in the original implementation's `Server.generateMap`: fetch
both RIB dumps, decode each, merge the two decode results, resolve ASN
descriptions, build the graph, then publish. A single generation run
aborts on the first fetch or decode error (spec §7); registry lookups
never fail the run, since a missing registry entry degrades to the
default `"AS<n>"` description rather than aborting.
*/
use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Instant;

use log::{info, warn};

use crate::config::Config;
use crate::error::GenerateError;
use crate::fetch::fetch_dumps;
use crate::graphbuild::build_snapshot;
use crate::models::Asn;
use crate::mrt::{self, DecodeResult};
use crate::publish::Store;
use crate::registry::Registry;

/// Owns the published snapshot store and serializes concurrent
/// generation requests (spec §11 open question: a trigger arriving
/// while a generation is already running is a no-op, not a queued
/// retry).
pub struct Pipeline {
    config: Config,
    registry: Registry,
    store: Store,
    generating: Mutex<()>,
}

impl Pipeline {
    pub fn new(config: Config) -> Pipeline {
        let registry = Registry::new(config.registry_path.clone());
        let store = Store::new(
            config.output_file.clone().into(),
            config.post_generate_command.clone(),
        );
        Pipeline {
            config,
            registry,
            store,
            generating: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Runs one full generation. Returns `false` without doing anything
    /// if another generation is already in progress.
    pub fn generate(&self, now_unix: u64) -> Result<bool, GenerateError> {
        let Ok(_guard) = self.generating.try_lock() else {
            return Ok(false);
        };

        let start = Instant::now();
        let dumps = fetch_dumps(&self.config.mrt_collector)?;

        let ipv4 = mrt::decode(&dumps.ipv4)?;
        let ipv6 = mrt::decode(&dumps.ipv6)?;
        let merged = ipv4.merge(ipv6);

        let unique_asns: Vec<Asn> = asns_seen_in_paths(&merged)
            .into_iter()
            .map(Asn::new)
            .collect();
        let descriptions = self.registry.describe_all(&unique_asns);

        let snapshot = build_snapshot(&merged, &descriptions, now_unix);
        if let Err(e) = self.store.publish(snapshot) {
            warn!("{e}");
        }

        info!("map generation completed in {:?}", start.elapsed());
        Ok(true)
    }
}

fn asns_seen_in_paths(result: &DecodeResult) -> Vec<u32> {
    result
        .as_paths
        .iter()
        .flat_map(|path| path.iter().copied())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect()
}
