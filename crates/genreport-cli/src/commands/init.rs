//! Initialize a new Genreport project

use anyhow::Result;
use std::fs;
use std::path::Path;

use genreport_core::config::CONFIG_FILE;

const REFERENCE_DATA: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<ReferenceData>
  <Factors>
    <ValueFactor>
      <High>0.946</High>
      <Medium>0.696</Medium>
      <Low>0.265</Low>
    </ValueFactor>
    <EmissionsFactor>
      <High>0.812</High>
      <Medium>0.562</Medium>
      <Low>0.312</Low>
    </EmissionsFactor>
  </Factors>
</ReferenceData>
"#;

const SAMPLE_REPORT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<GenerationReport>
  <Wind>
    <WindGenerator>
      <Name>Wind[Offshore]</Name>
      <Generation>
        <Day>
          <Date>2017-01-01T00:00:00+00:00</Date>
          <Energy>100.368</Energy>
          <Price>20.148</Price>
        </Day>
      </Generation>
      <Location>Offshore</Location>
    </WindGenerator>
  </Wind>
  <Gas>
    <GasGenerator>
      <Name>Gas[1]</Name>
      <Generation>
        <Day>
          <Date>2017-01-01T00:00:00+00:00</Date>
          <Energy>259.235</Energy>
          <Price>15.837</Price>
        </Day>
      </Generation>
      <EmissionsRating>0.038</EmissionsRating>
    </GasGenerator>
  </Gas>
  <Coal>
    <CoalGenerator>
      <Name>Coal[1]</Name>
      <Generation>
        <Day>
          <Date>2017-01-01T00:00:00+00:00</Date>
          <Energy>350.487</Energy>
          <Price>10.146</Price>
        </Day>
      </Generation>
      <TotalHeatInput>11.815</TotalHeatInput>
      <ActualNetGeneration>11.815</ActualNetGeneration>
      <EmissionsRating>0.482</EmissionsRating>
    </CoalGenerator>
  </Coal>
</GenerationReport>
"#;

/// Run the init command
pub async fn run(path: &str, name: Option<&str>) -> Result<()> {
    let project_dir = Path::new(path);

    if !project_dir.exists() {
        fs::create_dir_all(project_dir)?;
    }

    let abs_path = project_dir.canonicalize()?;

    let project_name = match name {
        Some(n) => n.to_string(),
        None => abs_path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("Could not determine project name from path"))?,
    };

    if project_dir.join(CONFIG_FILE).exists() {
        anyhow::bail!(
            "Directory '{}' already contains a {}",
            project_dir.display(),
            CONFIG_FILE
        );
    }

    tracing::info!("Creating new Genreport project: {}", project_name);

    fs::create_dir_all(project_dir.join("data/input"))?;
    fs::create_dir_all(project_dir.join("data/output"))?;

    let config = format!(
        r#"# Genreport Project Configuration
name: {project_name}

# Relative paths resolve against this file's directory
input_dir: data/input
output_dir: data/output
reference_data: data/ReferenceData.xml

watch:
  extension: xml
  settle_delay_ms: 250
"#
    );
    fs::write(project_dir.join(CONFIG_FILE), config)?;

    fs::write(project_dir.join("data/ReferenceData.xml"), REFERENCE_DATA)?;
    fs::write(project_dir.join("data/input/01-Basic.xml"), SAMPLE_REPORT)?;

    let gitignore = r#"# Result documents
data/output/

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
    tracing::info!("  genreport validate    # Check configuration");
    tracing::info!("  genreport run         # Start watching");

    Ok(())
}
