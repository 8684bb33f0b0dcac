//! Build automation tasks for the strip-flicker project.
//!
//! Run with: `cargo xtask <command>`

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use std::process::{Command, ExitCode};

/// Pico 1 W (RP2040, Cortex-M0+).
const TARGET: &str = "thumbv6m-none-eabi";
const DEMO: &str = "flicker";

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation for strip-flicker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks: build lib and demo with and without Wi-Fi, run host tests, build docs
    CheckAll,
    /// Build the library for the Pico
    Build {
        #[arg(long)]
        wifi: bool,
    },
    /// Build the flicker demo
    Demo {
        #[arg(long)]
        wifi: bool,
    },
    /// Run the host-side tests
    Test,
    /// Build a UF2 firmware file of the flicker demo for drag-and-drop flashing
    Uf2 {
        #[arg(long)]
        wifi: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::CheckAll => check_all(),
        Commands::Build { wifi } => exit_code(build_lib(wifi)),
        Commands::Demo { wifi } => exit_code(build_demo(wifi, false)),
        Commands::Test => exit_code(host_tests()),
        Commands::Uf2 { wifi } => build_uf2(wifi),
    }
}

fn check_all() -> ExitCode {
    let workspace_root = workspace_root();

    println!("{}", "==> Building library...".cyan());
    for wifi in [false, true] {
        if !build_lib(wifi) {
            return ExitCode::FAILURE;
        }
    }

    println!("\n{}", "==> Building demo (no wifi, 6 strips)...".cyan());
    if !build_demo(false, false) {
        return ExitCode::FAILURE;
    }

    println!("\n{}", "==> Building demo (wifi, 4 strips)...".cyan());
    if !build_demo(true, false) {
        return ExitCode::FAILURE;
    }

    println!("\n{}", "==> Running host tests...".cyan());
    if !host_tests() {
        return ExitCode::FAILURE;
    }

    println!("\n{}", "==> Building documentation...".cyan());
    if !run_command(Command::new("cargo").current_dir(&workspace_root).args([
        "doc",
        "--target",
        TARGET,
        "--no-deps",
        "--features",
        &features(true),
        "--no-default-features",
    ])) {
        return ExitCode::FAILURE;
    }

    println!("\n{}", "==> All checks passed!".green().bold());
    ExitCode::SUCCESS
}

fn build_lib(wifi: bool) -> bool {
    let features = features(wifi);
    println!(
        "{}",
        format!("Building library with features: {features}").cyan()
    );

    run_command(Command::new("cargo").current_dir(workspace_root()).args([
        "build",
        "--lib",
        "--target",
        TARGET,
        "--features",
        &features,
        "--no-default-features",
    ]))
}

fn build_demo(wifi: bool, release: bool) -> bool {
    let features = features(wifi);
    println!(
        "{}",
        format!("Building '{DEMO}' with features: {features}").cyan()
    );

    let mut cmd = Command::new("cargo");
    cmd.current_dir(workspace_root()).args([
        "build",
        "--example",
        DEMO,
        "--target",
        TARGET,
        "--features",
        &features,
        "--no-default-features",
    ]);
    if release {
        cmd.arg("--release");
    }

    run_command(&mut cmd)
}

fn host_tests() -> bool {
    let mut test_cmd = Command::new("cargo");
    test_cmd.current_dir(workspace_root()).arg("test");

    match host_target() {
        Some(target) => {
            println!(
                "  {}",
                format!("Using host target: {target}").bright_black()
            );
            test_cmd.arg("--target").arg(target);
        }
        None => {
            println!(
                "{}",
                "  Unable to detect host target; relying on cargo default.".bright_black()
            );
        }
    }

    test_cmd.args(["--no-default-features", "--features", "host"]);

    run_command(&mut test_cmd)
}

fn build_uf2(wifi: bool) -> ExitCode {
    if !build_demo(wifi, true) {
        return ExitCode::FAILURE;
    }

    let elf_path = format!("target/{TARGET}/release/examples/{DEMO}");
    let uf2_path = format!("{DEMO}.uf2");

    println!("\n{}", "Converting to UF2 format...".cyan());

    if run_command(
        Command::new("elf2uf2-rs")
            .current_dir(workspace_root())
            .args([&elf_path, &uf2_path]),
    ) {
        println!("{}", format!("UF2 created: {uf2_path}").green().bold());
        ExitCode::SUCCESS
    } else {
        println!(
            "{}",
            "Note: Install elf2uf2-rs with: cargo install elf2uf2-rs".yellow()
        );
        ExitCode::FAILURE
    }
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn features(wifi: bool) -> String {
    let mut features = vec!["pico1", "arm"];
    if wifi {
        features.push("wifi");
    }
    features.join(",")
}

fn workspace_root() -> std::path::PathBuf {
    // `cargo xtask` runs from the workspace root
    std::env::current_dir().expect("Failed to get current directory")
}

fn host_target() -> Option<String> {
    let output = Command::new("rustc").arg("-vV").output().ok()?;
    if !output.status.success() {
        return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    stdout
        .lines()
        .find_map(|line| line.strip_prefix("host: "))
        .map(|host| host.trim().to_owned())
}

fn run_command(cmd: &mut Command) -> bool {
    match cmd.status() {
        Ok(status) => status.success(),
        Err(e) => {
            eprintln!("{}", format!("Failed to execute command: {e}").red());
            false
        }
    }
}
