//! Initialize a new dietflow project

use anyhow::Result;
use dietflow_core::config::CONFIG_FILE_NAME;
use std::fs;
use std::path::Path;

const SAMPLE_DATA: &str = "\
grouping,mc_run_id,mean_ghgs,mean_land,mean_watscar,mean_eut,mean_bio,mean_watuse,n_participants,diet_group,sex,age_group
vegan_female_20-29,1,2.52,2.03,15421.3,5.01,0.13,240.5,291,vegan,female,20-29
veggie_female_20-29,1,3.96,4.21,17986.9,9.33,0.29,301.2,1254,veggie,female,20-29
fish_female_30-39,1,4.28,4.82,20110.4,10.8,0.36,332.7,1012,fish,female,30-39
meat_female_30-39,1,5.27,8.39,21743.6,14.9,0.51,349.1,980,meat,female,30-39
meat50_female_40-49,1,6.61,11.7,24015.2,20.1,0.66,371.4,1533,meat50,female,40-49
meat100_female_40-49,1,9.21,18.5,28530.8,29.7,0.95,412.6,611,meat100,female,40-49
vegan_male_20-29,1,2.71,2.19,16014.7,5.32,0.14,251.8,110,vegan,male,20-29
veggie_male_30-39,1,4.11,4.45,18412.3,9.81,0.31,309.5,402,veggie,male,30-39
fish_male_40-49,1,4.52,5.13,20877.1,11.6,0.38,340.2,388,fish,male,40-49
meat_male_50-59,1,5.58,8.96,22315.9,15.8,0.54,356.3,297,meat,male,50-59
meat50_male_50-59,1,7.02,12.5,24899.4,21.4,0.70,379.9,812,meat50,male,50-59
meat100_male_60-69,1,10.24,20.7,30122.5,32.8,1.04,428.1,1190,meat100,male,60-69
";

/// Run the init command
pub fn run(path: &str, name: Option<&str>) -> Result<()> {
    let project_dir = Path::new(path);

    // Create directory if it doesn't exist
    if !project_dir.exists() {
        fs::create_dir_all(project_dir)?;
    }

    // Get absolute path for deriving name
    let abs_path = project_dir.canonicalize()?;

    // Derive project name from directory name if not provided
    let project_name = match name {
        Some(n) => n.to_string(),
        None => abs_path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("Could not determine project name from path"))?,
    };

    // Check if already initialized
    if project_dir.join(CONFIG_FILE_NAME).exists() {
        anyhow::bail!(
            "Directory '{}' already contains a {}",
            project_dir.display(),
            CONFIG_FILE_NAME
        );
    }

    tracing::info!("Creating new dietflow project: {}", project_name);

    let config = format!(
        r#"# dietflow project configuration
name: {project_name}

input:
  path: data/sample.csv
  delimiter: ","

output:
  path: sankey.html
  format: html   # html or json

diagram:
  font_size: 13
  width: 1300
  height: 700
  margin:
    l: 10
    r: 10
    t: 50
    b: 10
  node:
    pad: 20
    thickness: 22
    line_color: black
    line_width: 0.5
"#
    );
    fs::write(project_dir.join(CONFIG_FILE_NAME), config)?;

    fs::create_dir_all(project_dir.join("data"))?;
    fs::write(project_dir.join("data/sample.csv"), SAMPLE_DATA)?;

    let gitignore = r#"# Rendered artifacts
sankey.html
sankey.json

# IDE
.idea/
.vscode/
*.swp
"#;
    fs::write(project_dir.join(".gitignore"), gitignore)?;

    tracing::info!(
        "✓ Created project '{}' at {}",
        project_name,
        abs_path.display()
    );
    tracing::info!("");
    tracing::info!("Next steps:");
    if path != "." {
        tracing::info!("  cd {}", project_dir.display());
    }
    tracing::info!("  dietflow validate    # Check the dataset");
    tracing::info!("  dietflow run         # Write sankey.html");

    Ok(())
}
