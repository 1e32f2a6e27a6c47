use plstats::analysis::{DEFAULT_TOP_N, count_occurrences, top_counts};

/// Deterministic pseudo-random key sequences, no extra crates needed.
fn sequences() -> Vec<Vec<String>> {
    let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
    (0..50)
        .map(|len| {
            (0..len * 3)
                .map(|_| {
                    seed ^= seed << 13;
                    seed ^= seed >> 7;
                    seed ^= seed << 17;
                    format!("k{}", seed % (len as u64 + 1))
                })
                .collect()
        })
        .collect()
}

#[test]
fn ranking_is_bounded_and_non_increasing() {
    for keys in sequences() {
        let distinct = count_occurrences(keys.clone()).len();

        for n in [0, 1, 2, DEFAULT_TOP_N, 100] {
            let top = top_counts(keys.clone(), n);

            assert!(top.len() <= n.min(distinct));
            assert_eq!(top.len(), n.min(distinct));
            assert!(top.windows(2).all(|w| w[0].count >= w[1].count));
        }
    }
}

#[test]
fn counts_sum_to_number_of_occurrences() {
    for keys in sequences() {
        let total: u64 = count_occurrences(keys.clone()).iter().map(|e| e.count).sum();
        assert_eq!(total, keys.len() as u64);
    }
}

#[test]
fn ranking_is_idempotent() {
    for keys in sequences() {
        assert_eq!(
            top_counts(keys.clone(), DEFAULT_TOP_N),
            top_counts(keys, DEFAULT_TOP_N)
        );
    }
}

#[test]
fn equal_counts_keep_first_seen_order() {
    let top = top_counts(["c", "a", "b", "a", "b", "c", "d"], 3);
    let keys: Vec<&str> = top.iter().map(|e| e.key).collect();
    assert_eq!(keys, vec!["c", "a", "b"]);
}
