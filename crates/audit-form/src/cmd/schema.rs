use anyhow::Result;
use audit_spec::QuestionSchema;

pub fn run() -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(&QuestionSchema::json_schema())?
    );
    Ok(())
}
