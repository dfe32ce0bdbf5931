//! Motif and discord discovery on a synthetic signal.
//!
//! Two patterns are planted twice each in a slow sine background, plus one
//! glitch. The self-join matrix profile recovers the planted pairs as motifs
//! and the glitch as the top discord; a MASS search then locates every
//! occurrence of the first motif.
//!
//! Run with: cargo run --release --example motif_discovery

use tsmp::{find_best_n_occurrences, Engine, MatrixProfileConfig, TimeSeriesSet};

fn main() -> tsmp::Result<()> {
    let n = 600;
    let m = 30;

    let mut ts = Vec::with_capacity(n);
    for i in 0..n {
        let t = i as f64;
        let mut val = (t * std::f64::consts::TAU / 200.0).sin() * 0.3;

        // Pattern A: sharp pulse
        for &center in &[60.0, 330.0] {
            let d = (t - center).abs();
            if d < 15.0 {
                val += 2.0 * (-d * d / 20.0).exp();
            }
        }

        // Pattern B: double bump
        for &center in &[170.0, 450.0] {
            let d1 = (t - (center - 5.0)).abs();
            let d2 = (t - (center + 5.0)).abs();
            if d1 < 15.0 || d2 < 15.0 {
                val += 1.5 * (-d1 * d1 / 10.0).exp() + 1.5 * (-d2 * d2 / 10.0).exp();
            }
        }

        // Glitch
        if (520..524).contains(&i) {
            val -= 1.2;
        }

        val += ((t * 7.1).sin() * (t * 11.3).cos()) * 0.02;
        ts.push(val);
    }

    let engine = Engine::new(MatrixProfileConfig::new(m));
    let set = TimeSeriesSet::single(&ts)?;
    let profiles = engine.stomp_self_join(&set)?;

    println!("Motif Discovery");
    println!("===============");
    println!("Time series length: {n}");
    println!("Subsequence length: {m}");
    println!(
        "Batch threshold: {} subsequences\n",
        engine.config().batch_threshold()
    );

    let motifs = engine.find_best_n_motifs(&profiles, 2)?;
    for (i, record) in motifs[0].records.iter().enumerate() {
        println!(
            "  Motif #{}: offsets ({}, {}), distance = {:.6}",
            i + 1,
            record.query_index,
            record.reference_index,
            record.distance
        );
    }

    let discords = engine.find_best_n_discords(&profiles, 1)?;
    for record in &discords[0].records {
        println!(
            "\n  Top discord at offset {} (nearest neighbour {}), distance = {:.6}",
            record.query_index, record.reference_index, record.distance
        );
    }

    if let Some(best) = motifs[0].records.first() {
        let start = best.query_index;
        let query = &ts[start..start + m];
        println!("\nMASS search for the window at offset {start}:");
        for occ in find_best_n_occurrences(query, &ts, 3)? {
            println!("  offset {:>4}: distance = {:.6}", occ.index, occ.distance);
        }
    }

    Ok(())
}
