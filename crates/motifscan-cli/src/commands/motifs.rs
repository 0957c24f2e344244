use crate::cli::MotifsArgs;
use crate::error::Result;
use motifscan::core::motifs::library::{DEFAULT_PAGE_SIZE, MotifLibrary};
use tracing::info;

pub fn run(args: MotifsArgs) -> Result<()> {
    info!("Loading motif library from {:?}", &args.motifs);
    let library = MotifLibrary::load(&args.motifs, DEFAULT_PAGE_SIZE)?;

    let lines = describe(&library, args.ec.as_deref());
    for line in &lines {
        println!("{}", line);
    }
    println!(
        "✓ {} of {} motif(s) listed.",
        lines.len(),
        library.len()
    );
    Ok(())
}

/// One line per motif: identifier, EC number, source structure, then the active site.
fn describe(library: &MotifLibrary, ec_filter: Option<&str>) -> Vec<String> {
    library
        .filtered(ec_filter)
        .map(|motif| {
            let residues: Vec<String> = motif.active_site.iter().map(ToString::to_string).collect();
            format!(
                "{:<12} {:<14} {:<8} {}",
                motif.id,
                motif.ec_number,
                motif.source_structure,
                residues.join(", ")
            )
        })
        .collect()
}
