use boxlattice::{BoxArray, DistributionConfig, DistributionMapping, IndexBox, IntVect, Layout, Strategy};
use clap::Parser;
use log::info;




#[derive(Debug, Parser)]
#[clap(version = "1.0", about = "Decompose a cubic domain and distribute its boxes")]
struct Opts {
    #[clap(short = 'd', long, default_value = "128")]
    domain_size: i32,

    #[clap(short = 'm', long, default_value = "32")]
    max_grid_size: i32,

    #[clap(short = 'n', long, default_value = "4")]
    nprocs: usize,

    #[clap(short = 's', long)]
    strategy: Option<Strategy>,

    #[clap(short = 't', long)]
    team_size: Option<usize>,

    #[clap(short = 'c', long)]
    config: Option<std::path::PathBuf>,

    #[clap(short = 'o', long, default_value = "mapping.cbor")]
    output: std::path::PathBuf,
}




#[derive(serde::Serialize)]


/**
 * What gets written to disk
 */
struct Output {
    boxes: BoxArray,
    mapping: DistributionMapping,
    efficiency: f64,
}




// ============================================================================
fn main() -> Result<(), Box<dyn std::error::Error>> {
    simple_logger::SimpleLogger::new().with_level(log::LevelFilter::Info).init()?;

    let opts = Opts::parse();

    let mut config = match &opts.config {
        Some(path) => std::fs::read_to_string(path)?.parse()?,
        None => DistributionConfig::default(),
    };
    if let Some(strategy) = opts.strategy {
        config.strategy = strategy;
    }
    if let Some(team_size) = opts.team_size {
        config.team_size = team_size;
    }
    config.verbose = true;

    let domain = IndexBox::new(IntVect::zero(), IntVect::splat(opts.domain_size - 1));
    let mut boxes = BoxArray::from_domain(domain);
    boxes.max_size(&IntVect::splat(opts.max_grid_size));
    info!("{} boxes covering {}", boxes.len(), domain);

    let layout = Layout::new(opts.nprocs).with_teams(config.team_size)?;
    let mapping = DistributionMapping::with_layout(&boxes, &layout, &config);
    mapping.check(boxes.len(), opts.nprocs)?;

    let efficiency = mapping.efficiency(&boxes.weights(), opts.nprocs);
    println!("{}", mapping);
    println!("efficiency ... {:.4}", efficiency);

    let file = std::fs::File::create(&opts.output)?;
    let mut buffer = std::io::BufWriter::new(file);
    ciborium::ser::into_writer(&Output { boxes, mapping, efficiency }, &mut buffer)?;
    info!("wrote {}", opts.output.display());
    Ok(())
}
