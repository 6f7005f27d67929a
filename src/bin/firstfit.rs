//! First Fit simulator console
//!
//! Interactive menu-driven front end over the block-list manager. All
//! simulator output goes to stdout; diagnostics are routed through
//! `tracing` and stay silent unless `RUST_LOG` says otherwise.

use anyhow::{bail, Result};
use clap::Parser;
use firstfit_rs::{BlockSnapshot, FirstFitManager, LogEntry};
use std::io::{self, BufRead, Write};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "firstfit")]
#[command(about = "First Fit memory allocation simulator")]
struct Args {
    /// Total memory size in units
    #[arg(short = 'm', long, default_value = "1000")]
    memory: u64,

    /// Run the scripted demo instead of the interactive menu
    #[arg(long)]
    demo: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let args = Args::parse();

    if args.memory == 0 {
        bail!("memory size must be positive");
    }

    info!(memory = args.memory, "starting simulator");
    let mut memory = FirstFitManager::new(args.memory)?;

    if args.demo {
        run_demo(&mut memory)?;
    } else {
        run_menu(&mut memory)?;
    }

    Ok(())
}

/// Main interactive loop; returns on exit choice or end of input
fn run_menu(memory: &mut FirstFitManager) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    println!("Welcome to the First Fit Memory Management Simulator!");
    println!("Initialized with {} units of memory.", memory.total_size());

    loop {
        print_menu();

        let choice = match prompt_number::<u32>(&mut lines, "Select an option (1-8): ")? {
            Some(n @ 1..=8) => n,
            Some(_) => {
                println!("Invalid input. Please try again.");
                continue;
            }
            None => break,
        };

        match choice {
            1 => handle_allocate(memory, &mut lines)?,
            2 => handle_deallocate(memory, &mut lines)?,
            3 => print_status(memory),
            4 => print_memory_map(&memory.memory_map()),
            5 => print_log(memory.log()),
            6 => print_fragmentation(memory),
            7 => export_state(memory)?,
            _ => {
                println!("\nThank you for using the Memory Management Simulator!");
                break;
            }
        }
    }

    Ok(())
}

fn print_menu() {
    println!();
    println!("{}", "=".repeat(60));
    println!("FIRST FIT MEMORY MANAGEMENT SIMULATOR");
    println!("{}", "=".repeat(60));
    println!("1. Allocate Memory");
    println!("2. Deallocate Memory");
    println!("3. Display Memory Status");
    println!("4. Display Memory Map");
    println!("5. Show Operation Log");
    println!("6. Display Fragmentation Info");
    println!("7. Export State (JSON)");
    println!("8. Exit Program");
    println!("{}", "=".repeat(60));
}

/// Prompt until a line parses; `None` means end of input
fn prompt_number<T: std::str::FromStr>(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    prompt: &str,
) -> Result<Option<T>> {
    loop {
        print!("{prompt}");
        io::stdout().flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => return Ok(None),
        };

        match line.trim().parse::<T>() {
            Ok(value) => return Ok(Some(value)),
            Err(_) => println!("Please enter a valid non-negative number."),
        }
    }
}

/// Like [`prompt_number`] but rejects zero
fn prompt_positive<T: std::str::FromStr + From<u8> + PartialEq>(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    prompt: &str,
) -> Result<Option<T>> {
    loop {
        match prompt_number::<T>(lines, prompt)? {
            Some(value) if value == T::from(0u8) => {
                println!("Value must be positive. Please try again.");
            }
            other => return Ok(other),
        }
    }
}

fn handle_allocate(
    memory: &mut FirstFitManager,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<()> {
    println!("\n--- ALLOCATE MEMORY ---");

    let Some(process_id) = prompt_positive::<u32>(lines, "Enter Process ID: ")? else {
        return Ok(());
    };
    let Some(size) = prompt_positive::<u64>(lines, "Enter Memory Size (units): ")? else {
        return Ok(());
    };

    match memory.allocate(process_id, size) {
        Ok(address) => println!(
            "Allocated {size} units for process {process_id} at address {address}."
        ),
        Err(err) => println!("Allocation failed: {err}"),
    }

    if let Some(entry) = memory.log().last() {
        println!("Log: {entry}");
    }

    Ok(())
}

fn handle_deallocate(
    memory: &mut FirstFitManager,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<()> {
    println!("\n--- DEALLOCATE MEMORY ---");

    let Some(process_id) = prompt_positive::<u32>(lines, "Enter Process ID to deallocate: ")? else {
        return Ok(());
    };

    match memory.deallocate(process_id) {
        Ok(merge) => println!("Deallocated memory for process {process_id} ({merge})."),
        Err(err) => println!("Deallocation failed: {err}"),
    }

    if let Some(entry) = memory.log().last() {
        println!("Log: {entry}");
    }

    Ok(())
}

fn print_status(memory: &FirstFitManager) {
    let status = memory.status();

    println!("\n--- MEMORY STATUS ---");
    println!("Total Memory: {} units", status.total_size);
    println!("Allocated: {} units", status.allocated_total);
    println!("Free: {} units", status.free_total);
    println!("Utilization: {:.1}%", status.utilization * 100.0);
    println!("Number of blocks: {}", status.block_count);
    println!("Free blocks: {}", status.free_block_count);
}

fn print_memory_map(map: &[BlockSnapshot]) {
    println!();
    println!("{}", "=".repeat(70));
    println!("MEMORY MAP");
    println!("{}", "=".repeat(70));
    println!(
        "{:<8} {:<8} {:<8} {:<12} {:<10}",
        "Start", "End", "Size", "Status", "Process ID"
    );
    println!("{}", "-".repeat(70));

    for block in map {
        let status = if block.state.is_free() { "FREE" } else { "ALLOCATED" };
        let owner = block
            .owner
            .map(|pid| pid.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<8} {:<8} {:<8} {:<12} {:<10}",
            block.start, block.end, block.size, status, owner
        );
    }

    println!("{}", "-".repeat(70));
}

fn print_log(log: &[LogEntry]) {
    println!("\n--- OPERATION LOG ---");

    if log.is_empty() {
        println!("No operations performed yet.");
        return;
    }

    let shown = log.len().min(10);
    println!("Showing last {shown} entries:");
    println!("{}", "-".repeat(60));

    for entry in &log[log.len() - shown..] {
        println!("{entry}");
    }

    if log.len() > shown {
        println!("\n... and {} earlier entries", log.len() - shown);
    }
}

fn print_fragmentation(memory: &FirstFitManager) {
    let report = memory.fragmentation();

    println!();
    println!("{}", "=".repeat(50));
    println!("FRAGMENTATION ANALYSIS");
    println!("{}", "=".repeat(50));
    println!("Total Memory: {} units", memory.total_size());
    println!("Allocated Memory: {} units", report.allocated_total);
    println!("Free Memory: {} units", report.free_total);
    println!("Memory Utilization: {:.1}%", report.utilization * 100.0);
    println!("Largest Free Block: {} units", report.largest_free_block);
    println!(
        "External Fragmentation: {} extra blocks",
        report.external_fragmentation
    );
    println!(
        "Internal Fragmentation: {} units",
        report.internal_fragmentation
    );
    println!("{}", "=".repeat(50));
}

/// Dump the whole simulator state as pretty-printed JSON
fn export_state(memory: &FirstFitManager) -> Result<()> {
    let state = serde_json::json!({
        "status": memory.status(),
        "fragmentation": memory.fragmentation(),
        "memory_map": memory.memory_map(),
        "log": memory.log(),
    });

    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}

/// Scripted walk-through: allocate three processes, free the middle one,
/// and show the resulting fragmentation
fn run_demo(memory: &mut FirstFitManager) -> Result<()> {
    println!("First Fit Memory Management Demo");
    println!("{}", "=".repeat(40));

    println!("Initial memory state:");
    print_memory_map(&memory.memory_map());

    println!("\nAllocating memory:");
    memory.allocate(1, 200)?;
    memory.allocate(2, 150)?;
    memory.allocate(3, 100)?;
    print_memory_map(&memory.memory_map());

    println!("\nMemory status:");
    print_status(memory);

    println!("\nDeallocating process 2:");
    memory.deallocate(2)?;
    print_memory_map(&memory.memory_map());

    print_fragmentation(memory);

    println!("\nDemo completed successfully!");
    Ok(())
}
