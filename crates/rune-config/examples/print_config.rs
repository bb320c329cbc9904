/// Example program to print the loaded transition configuration
///
/// Run with: cargo run -p rune-config --example print_config

fn main() {
    let config = rune_config::RuneConfig::load();

    println!("=== Rune Transition Configuration ===\n");
    println!("  Default Animation: {}", config.transition.default_animation);
    println!("  Ordering: {}", config.transition.ordering);
    println!("  Snapshot Overlay: {}", config.transition.snapshot_overlay);
    println!("  Default Easing: {}", config.transition.default_easing);
    println!("  Base Duration: {}ms", config.transition.base_duration_ms);
    println!();

    match toml::to_string_pretty(&config) {
        Ok(toml_str) => {
            println!("=== Serialized Configuration ===");
            println!("{}", toml_str);
        }
        Err(e) => {
            eprintln!("Failed to serialize config: {}", e);
        }
    }
}
