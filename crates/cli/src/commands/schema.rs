use anyhow::Result;
use stint_core::configs::runner::schema;

pub fn execute() -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&schema())?);
    Ok(())
}
