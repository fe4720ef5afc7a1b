use std::path::PathBuf;

use clap::Parser;
use olo::{optimal_leaf_ordering, DistanceMatrix, LinkageRow};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

/// Reorders a binary linkage tree's leaves to minimize the sum of
/// adjacent-leaf distances, given a linkage matrix and a distance matrix.
///
/// This binary is a demo/collaborator around the `olo` library, not part
/// of its contract: clustering and distance computation are out of scope
/// for the library itself, so without `--linkage`/`--distances` this demo
/// generates a synthetic dataset in-process instead.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// CSV file with columns left,right,height,size, one row per merge.
    #[arg(long, requires = "distances")]
    linkage: Option<PathBuf>,

    /// CSV file holding a square distance matrix, one row per leaf.
    #[arg(long, requires = "linkage")]
    distances: Option<PathBuf>,

    /// Leaf count for the synthetic dataset, used when --linkage is absent.
    #[arg(long, default_value_t = 12)]
    leaves: usize,

    /// RNG seed for the synthetic dataset.
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cli = Cli::parse();

    let (z, d, n) = match (cli.linkage, cli.distances) {
        (Some(linkage_path), Some(distances_path)) => {
            let z = read_linkage_csv(&linkage_path)?;
            let (d, n) = read_square_distances_csv(&distances_path)?;
            (z, d, n)
        }
        _ => {
            let mut rng = StdRng::seed_from_u64(cli.seed);
            let n = cli.leaves.max(2);
            let z = synthetic_linkage(n, &mut rng);
            let d = synthetic_distances(n, &mut rng);
            (z, d, n)
        }
    };

    let flat = d.clone();
    let reordered = optimal_leaf_ordering(z, DistanceMatrix::Square(d))?;

    let tree = olo::build_tree(reordered.clone(), n)?;
    let order = tree.in_order_leaves();
    let cost: f64 =
        order.windows(2).map(|pair| flat[pair[0] as usize * n + pair[1] as usize]).sum();

    println!("leaf order: {order:?}");
    println!("adjacent-sum cost: {cost:.4}");
    for (i, row) in reordered.iter().enumerate() {
        println!(
            "node {}: left={} right={} height={:.4} size={}",
            n + i,
            row.left,
            row.right,
            row.height,
            row.size
        );
    }

    Ok(())
}

fn read_linkage_csv(path: &PathBuf) -> Result<Vec<LinkageRow>, Box<dyn std::error::Error>> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(false).from_path(path)?;
    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let left: u32 = record.get(0).unwrap().parse()?;
        let right: u32 = record.get(1).unwrap().parse()?;
        let height: f64 = record.get(2).unwrap().parse()?;
        let size: u32 = record.get(3).unwrap().parse()?;
        rows.push(LinkageRow { left, right, height, size });
    }
    Ok(rows)
}

fn read_square_distances_csv(
    path: &PathBuf,
) -> Result<(Vec<f64>, usize), Box<dyn std::error::Error>> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(false).from_path(path)?;
    let mut flat = Vec::new();
    let mut n = 0;
    for record in rdr.records() {
        let record = record?;
        n += 1;
        for field in record.iter() {
            flat.push(field.parse::<f64>()?);
        }
    }
    Ok((flat, n))
}

fn synthetic_linkage(n: usize, rng: &mut StdRng) -> Vec<LinkageRow> {
    let mut pool: Vec<u32> = (0..n as u32).collect();
    let mut rows = Vec::with_capacity(n - 1);
    let mut next_internal = n as u32;
    for step in 0..n - 1 {
        let i = rng.gen_range(0..pool.len());
        let left = pool.swap_remove(i);
        let j = rng.gen_range(0..pool.len());
        let right = pool.swap_remove(j);
        rows.push(LinkageRow { left, right, height: step as f64, size: 0 });
        pool.push(next_internal);
        next_internal += 1;
    }
    rows
}

fn synthetic_distances(n: usize, rng: &mut StdRng) -> Vec<f64> {
    let points: Vec<f64> = (0..n).map(|_| rng.gen_range(0.0..100.0)).collect();
    let mut d = vec![0.0; n * n];
    for i in 0..n {
        for j in (i + 1)..n {
            let v = (points[i] - points[j]).abs();
            d[i * n + j] = v;
            d[j * n + i] = v;
        }
    }
    d
}
