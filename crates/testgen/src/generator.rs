use std::collections::HashMap;

use chrono::{DateTime, Local};
use isocheck_core::history::types::{History, Mop, Op, Value};
use rand::distr::{Distribution, Uniform};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Parameters of one generated history.
#[derive(Clone, Debug, Default, Deserialize, Serialize, TypedBuilder)]
pub struct HistParams {
    pub id: u64,
    pub n_txn: u64,
    pub n_key: u64,
    pub n_evt: u64,
    pub seed: u64,
}

/// A generated history with its parameters and generation timestamps.
#[derive(Deserialize, Serialize, Debug)]
pub struct GeneratedHistory {
    params: HistParams,
    info: String,
    start: DateTime<Local>,
    end: DateTime<Local>,
    data: History<String>,
}

impl GeneratedHistory {
    #[must_use]
    pub const fn new(
        params: HistParams,
        info: String,
        start: DateTime<Local>,
        end: DateTime<Local>,
        data: History<String>,
    ) -> Self {
        Self {
            params,
            info,
            start,
            end,
            data,
        }
    }

    #[must_use]
    pub const fn get_id(&self) -> u64 {
        self.params.id
    }

    #[must_use]
    pub const fn get_params(&self) -> &HistParams {
        &self.params
    }

    #[must_use]
    pub const fn get_data(&self) -> &History<String> {
        &self.data
    }

    #[must_use]
    pub fn into_data(self) -> History<String> {
        self.data
    }
}

/// Generates one list-append history from seeded randomness.
///
/// Each transaction issues `n_evt` micro-operations over `n_key` keys.
/// Appended values come from a per-key counter, so no value is ever
/// appended twice; a transaction appends to a key at most once, so no
/// append is intermediate. Reads observe a random *prefix* of the key's
/// sequence at the time of the read -- a stale snapshot -- which keeps
/// every observation prefix-consistent while still producing the
/// anti-dependency edges that make the generated graphs interesting.
#[must_use]
#[allow(clippy::missing_panics_doc)]
pub fn generate_history(params: &HistParams) -> GeneratedHistory {
    let start = Local::now();

    let mut rng = SmallRng::seed_from_u64(params.seed);
    let n_key = params.n_key.max(1);
    let key_range = Uniform::new(0, n_key).expect("non-empty key range");
    let coin = Uniform::new(0u64, 2).expect("non-empty coin range");

    // the evolving state: per-key appended sequence and value counter
    let mut sequences: HashMap<u64, Vec<i64>> = HashMap::new();
    let mut counters: HashMap<u64, i64> = HashMap::new();

    let mut data: History<String> = Vec::with_capacity(usize::try_from(params.n_txn).unwrap_or(0));
    for _ in 0..params.n_txn {
        let mut mops = Vec::with_capacity(usize::try_from(params.n_evt).unwrap_or(0));
        let mut appended: Vec<u64> = Vec::new();

        for _ in 0..params.n_evt {
            let key = key_range.sample(&mut rng);
            let want_append = coin.sample(&mut rng) == 1 && !appended.contains(&key);

            if want_append {
                let counter = counters.entry(key).or_insert(0);
                *counter += 1;
                let value = *counter + i64::try_from(key).unwrap_or(0) * 1_000_000;
                sequences.entry(key).or_default().push(value);
                appended.push(key);
                mops.push(Mop::append(format!("k{key}"), value));
            } else {
                let sequence = sequences.get(&key).map_or(&[][..], Vec::as_slice);
                let prefix_len = Uniform::new(0, sequence.len() + 1)
                    .expect("non-empty prefix range")
                    .sample(&mut rng);
                mops.push(Mop::read(
                    format!("k{key}"),
                    Value::Sequence(sequence[..prefix_len].to_vec()),
                ));
            }
        }
        data.push(Op::ok(0, mops));
    }

    let end = Local::now();
    GeneratedHistory::new(
        params.clone(),
        format!(
            "list-append history: {} txns, {} keys, {} events each",
            params.n_txn, n_key, params.n_evt
        ),
        start,
        end,
        data,
    )
}

/// Generates `n_hist` histories in parallel, seeded `base_seed + id`.
#[must_use]
pub fn generate_mult_histories(
    n_hist: u64,
    n_txn: u64,
    n_key: u64,
    n_evt: u64,
    base_seed: u64,
) -> Vec<GeneratedHistory> {
    (0..n_hist)
        .into_par_iter()
        .map(|id| {
            let params = HistParams::builder()
                .id(id)
                .n_txn(n_txn)
                .n_key(n_key)
                .n_evt(n_evt)
                .seed(base_seed + id)
                .build();
            generate_history(&params)
        })
        .collect()
}
