use miette::{IntoDiagnostic, Result};
use pkgkit_util::human_bytes;
use serde::Serialize;

#[derive(Serialize)]
struct HumanBytesResult {
    bytes: u64,
    human: String,
}

pub fn run(bytes: u64, json: bool) -> Result<()> {
    let human = human_bytes(bytes);
    if json {
        let result = HumanBytesResult { bytes, human };
        println!("{}", serde_json::to_string_pretty(&result).into_diagnostic()?);
    } else {
        println!("{human}");
    }
    Ok(())
}
