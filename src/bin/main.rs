use anyhow::{Context, Result};
use clap::Parser;
use ordtree::OrderedTree;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "ordtree-demo",
    about = "Build a balanced ordered tree and print its shape"
)]
struct Cli {
    /// Values to add, in order. The first one seeds the tree.
    #[arg(required = true, allow_negative_numbers = true)]
    values: Vec<i64>,

    /// Value to remove after all values are added. May be repeated.
    #[arg(long = "remove", allow_negative_numbers = true)]
    removals: Vec<i64>,

    /// Also print the tree as a Graphviz digraph.
    #[arg(long)]
    dot: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let (&seed, rest) = cli
        .values
        .split_first()
        .context("at least one value is required")?;

    let mut tree = OrderedTree::new(seed);

    for &value in rest {
        tree.add(value)
            .with_context(|| format!("failed to add {value}"))?;
        println!("add {value:>6}: {tree}");
    }

    for value in &cli.removals {
        let removed = tree
            .remove(value)
            .with_context(|| format!("failed to remove {value}"))?;

        if removed {
            println!("rm  {value:>6}: {tree}");
        } else {
            println!("rm  {value:>6}: not present");
        }
    }

    println!("depth:     {}", tree.depth());
    println!("balanced:  {}", tree.is_balanced());
    println!("complete:  {}", tree.is_complete());

    if let (Ok(min), Ok(max)) = (tree.min(), tree.max()) {
        println!("range:     {min}..={max}");
    }

    if cli.dot {
        let mut graph = String::new();
        tree.dotgraph("demo", &mut graph)
            .context("failed to format graph")?;
        println!("{graph}");
    }

    tree.assert_invariants();

    Ok(())
}
