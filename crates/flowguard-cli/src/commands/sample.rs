use flowguard_core::sample_project;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let data = sample_project();
    println!("{}", serde_json::to_string_pretty(&data)?);
    Ok(())
}
