//! CLI command implementations.

use projdyn_cli::{RunReport, ScenarioConfig};

/// Run a scenario from a TOML file.
pub fn simulate(config_path: &str, output: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let config = ScenarioConfig::load(config_path)?;

    println!("projdyn simulation");
    println!("──────────────────");
    println!("Config:   {config_path}");
    run(&config, output)
}

/// Validate a scenario without stepping it.
pub fn validate(config_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    println!("Validating: {config_path}");

    let config = ScenarioConfig::load(config_path)?;
    let sim = config.build()?;
    let mesh = sim.mesh();

    println!("  ✓ Scenario: {}", config.name);
    println!("  ✓ Vertices: {}", mesh.vertex_count());
    println!("  ✓ Faces: {}", mesh.faces().len());
    println!("  ✓ Tetrahedra: {}", mesh.elements().len());
    println!("  ✓ Constraints: {}", mesh.constraints().len());
    println!("  ✓ Pinned: {}", mesh.fixed_vertices().len());
    println!("  ✓ Step: dt={} iterations={}", config.params.dt, config.params.iterations);
    println!();
    println!("Validation passed.");
    Ok(())
}

/// Run the built-in hanging-cloth scenario.
pub fn demo(output: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    println!("projdyn demo: hanging cloth");
    println!("═══════════════════════════");
    run(&ScenarioConfig::hanging_cloth(), output)
}

fn run(config: &ScenarioConfig, output: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let report = config.run(output.is_some())?;
    print_summary(&report);

    if let Some(path) = output {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), &report)?;
        println!("Frames written to: {path}");
    }

    if !report.summary.finite {
        return Err("simulation produced non-finite positions".into());
    }
    Ok(())
}

fn print_summary(report: &RunReport) {
    let s = &report.summary;
    println!();
    println!("Scenario:        {}", s.name);
    println!("Vertices:        {}", s.vertices);
    println!("Constraints:     {}", s.constraints);
    println!("Frames:          {}", s.frames);
    println!("Factorizations:  {}", s.factorizations);
    println!("Wall time:       {:.3}s", s.wall_time);
    println!("Avg frame:       {:.3}ms", s.avg_frame_ms());
    println!("Final residual:  {:.3e}", s.final_residual);
    println!("Min Y:           {:.4}m", s.min_y);
    println!("Max pin drift:   {:.3e}m", s.max_pin_drift);
}
