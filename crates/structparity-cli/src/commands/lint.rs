use crate::cli::LintArgs;
use crate::error::{CliError, Result};
use structparity::core::io::corpus::Corpus;
use structparity::engine::exceptions::ExceptionTable;
use tracing::info;

pub async fn run(args: LintArgs) -> Result<()> {
    info!("Validating corpus {:?}", &args.path);
    let corpus = Corpus::from_path(&args.path)?;
    println!(
        "✓ {}: {} valid PDB identifiers",
        corpus.resource(),
        corpus.len()
    );

    if let Some(path) = &args.exceptions {
        let table = ExceptionTable::load(path).map_err(|e| CliError::FileParsing {
            path: path.clone(),
            source: e.into(),
        })?;
        println!("✓ {}: {} known exceptions", path.display(), table.len());
    }
    Ok(())
}
