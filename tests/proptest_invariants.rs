use proptest::prelude::*;
use tsmp::algorithms::common::{sliding_dot_product, sliding_dot_product_fft, sliding_dot_product_naive};
use tsmp::{
    band_size, find_best_n_discords, find_best_n_motifs, Engine, Error, ExclusionMask,
    MatrixProfileConfig, RollingStats, Tile, TimeSeriesSet, NO_NEIGHBOR,
};

fn series_strategy(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-50.0f64..50.0, min_len..max_len)
}

fn series_and_window(max_len: usize) -> impl Strategy<Value = (Vec<f64>, usize)> {
    series_strategy(2, max_len).prop_flat_map(|ts| {
        let n = ts.len();
        (Just(ts), 1..=n)
    })
}

fn window_beyond_series() -> impl Strategy<Value = (Vec<f64>, usize)> {
    series_strategy(0, 20).prop_flat_map(|ts| {
        let n = ts.len();
        (Just(ts), n + 1..n + 5)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn rolling_stats_match_windows((ts, m) in series_and_window(60)) {
        let stats = RollingStats::compute(&ts, m).unwrap();
        prop_assert_eq!(stats.mean.len(), ts.len() - m + 1);
        for i in 0..stats.len() {
            let w = &ts[i..i + m];
            let mu = w.iter().sum::<f64>() / m as f64;
            let var = w.iter().map(|x| (x - mu).powi(2)).sum::<f64>() / m as f64;
            prop_assert!((stats.mean[i] - mu).abs() < 1e-9);
            if stats.sigma_inv[i] > 0.0 {
                prop_assert!((stats.std[i].powi(2) - var).abs() < 1e-7);
            }
        }
    }

    #[test]
    fn sliding_dot_product_matches_brute_force((ts, m) in series_and_window(80)) {
        let q: Vec<f64> = ts[..m].iter().map(|x| x * 0.5 + 1.0).collect();
        let sdp = sliding_dot_product(&q, &ts).unwrap();
        prop_assert_eq!(sdp.len(), ts.len() - m + 1);
        for (i, &d) in sdp.iter().enumerate() {
            let brute: f64 = q.iter().zip(&ts[i..i + m]).map(|(a, b)| a * b).sum();
            prop_assert!((d - brute).abs() < 1e-8 * (1.0 + brute.abs()));
        }
    }

    #[test]
    fn fft_path_agrees_with_naive((ts, m) in series_and_window(200)) {
        let q = &ts[ts.len() - m..];
        let naive = sliding_dot_product_naive(q, &ts).unwrap();
        let fft = sliding_dot_product_fft(q, &ts).unwrap();
        prop_assert_eq!(naive.len(), fft.len());
        for (a, b) in naive.iter().zip(&fft) {
            prop_assert!((a - b).abs() < 1e-7 * (1.0 + a.abs()));
        }
    }

    #[test]
    fn mask_tiling_invariance(
        m in 1usize..20,
        rows in 1usize..30,
        cols in 1usize..30,
        row_offset in 0usize..40,
        col_offset in 0usize..40,
        row_split in 0usize..30,
        col_split in 0usize..30,
    ) {
        let row_split = row_split.min(rows);
        let col_split = col_split.min(cols);
        let whole = ExclusionMask::generate(m, Tile { rows, row_offset, cols, col_offset });
        for (r0, nr) in [(0, row_split), (row_split, rows - row_split)] {
            for (c0, nc) in [(0, col_split), (col_split, cols - col_split)] {
                if nr == 0 || nc == 0 {
                    continue;
                }
                let part = ExclusionMask::generate(m, Tile {
                    rows: nr,
                    row_offset: row_offset + r0,
                    cols: nc,
                    col_offset: col_offset + c0,
                });
                for r in 0..nr {
                    for c in 0..nc {
                        prop_assert_eq!(part.is_excluded(r, c), whole.is_excluded(r0 + r, c0 + c));
                    }
                }
            }
        }
    }

    #[test]
    fn self_join_never_matches_inside_band(ts in series_strategy(20, 90), m in 2usize..8) {
        let engine = Engine::new(MatrixProfileConfig::new(m).with_batch_size(9));
        let set = engine.stomp_self_join(&TimeSeriesSet::single(&ts).unwrap()).unwrap();
        let mp = &set.profiles[0];
        let band = band_size(m);
        for (i, (&d, &j)) in mp.profile.iter().zip(&mp.profile_index).enumerate() {
            prop_assert!(d >= 0.0);
            prop_assert!(j.abs_diff(i) >= band);
            prop_assert_eq!(d.is_finite(), j != NO_NEIGHBOR);
        }
    }

    #[test]
    fn stomp_is_deterministic(ts in series_strategy(10, 70), m in 2usize..6) {
        let engine = Engine::new(MatrixProfileConfig::new(m).with_batch_size(7));
        let set = TimeSeriesSet::single(&ts).unwrap();
        let a = engine.stomp_self_join(&set).unwrap();
        let b = engine.stomp_self_join(&set).unwrap();
        prop_assert_eq!(&a.profiles[0].profile, &b.profiles[0].profile);
        prop_assert_eq!(&a.profiles[0].profile_index, &b.profiles[0].profile_index);
    }

    #[test]
    fn infeasible_counts_rejected(len in 4usize..60, m in 1usize..12, extra in 1usize..10) {
        prop_assume!(m <= len);
        let ts: Vec<f64> = (0..len).map(|i| (i as f64 * 0.9).sin()).collect();
        let engine = Engine::new(MatrixProfileConfig::new(m));
        let set = engine.stomp_self_join(&TimeSeriesSet::single(&ts).unwrap()).unwrap();
        let bound = (len - m + 1).div_ceil(m.div_ceil(2)).max(1);
        let motifs = find_best_n_motifs(&set, bound + extra);
        prop_assert!(matches!(motifs, Err(Error::InvalidArgument(_))));
        let discords = find_best_n_discords(&set, bound + extra);
        prop_assert!(matches!(discords, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn accepted_motifs_neither_overlap_nor_mirror(ts in series_strategy(40, 120), m in 2usize..7, n in 1usize..4) {
        let engine = Engine::new(MatrixProfileConfig::new(m));
        let set = engine.stomp_self_join(&TimeSeriesSet::single(&ts).unwrap()).unwrap();
        let half = m.div_ceil(2);
        if let Ok(found) = find_best_n_motifs(&set, n) {
            let records = &found[0].records;
            prop_assert_eq!(records.len(), n);
            for (k, a) in records.iter().enumerate() {
                for b in &records[k + 1..] {
                    let direct = a.reference_index.abs_diff(b.reference_index) < half
                        && a.query_index.abs_diff(b.query_index) < half;
                    let mirrored = a.reference_index.abs_diff(b.query_index) < half
                        && a.query_index.abs_diff(b.reference_index) < half;
                    prop_assert!(!direct && !mirrored);
                }
            }
        }
    }

    #[test]
    fn oversized_or_empty_windows_rejected((ts, m) in window_beyond_series()) {
        let q = vec![1.0; m];
        prop_assert!(matches!(sliding_dot_product(&q, &ts), Err(Error::InvalidArgument(_))));
        prop_assert!(matches!(sliding_dot_product(&[], &ts), Err(Error::InvalidArgument(_))));
        prop_assert!(matches!(RollingStats::compute(&ts, m), Err(Error::InvalidArgument(_))));
        prop_assert!(matches!(RollingStats::compute(&ts, 0), Err(Error::InvalidArgument(_))));
    }
}
