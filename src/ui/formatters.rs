//! Text rendering of snapshots and readings for the terminal.

use colored::*;
use humansize::{format_size as human_format_size, DECIMAL};

use crate::core::system_info::SystemInfo;
use crate::core::system_monitor::{
    AlertThresholds, GpuSample, Metric, NetworkIdentity, ProcessEntry, ProcessRisk, Reading,
    Snapshot,
};

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Format a byte count as binary gigabytes with one decimal (`7.8GB`)
pub fn format_gb(bytes: u64) -> String {
    format!("{:.1}GB", bytes as f64 / BYTES_PER_GB)
}

/// Binary gigabytes with two decimals (`15.53 GB`)
pub fn format_gb_precise(bytes: u64) -> String {
    format!("{:.2} GB", bytes as f64 / BYTES_PER_GB)
}

pub fn format_frequency(mhz: Option<u64>) -> String {
    match mhz {
        Some(mhz) => format!("{}MHz", mhz),
        None => "N/A".to_string(),
    }
}

/// Format a disk or memory size in human-readable decimal units
pub fn format_size(bytes: u64) -> String {
    human_format_size(bytes, DECIMAL)
}

/// `<used> / <total>` memory line
pub fn format_ram_usage(used_bytes: u64, total_bytes: u64) -> String {
    format!("{} / {}", format_gb(used_bytes), format_gb(total_bytes))
}

pub fn format_latency(latency: &Reading<u32>) -> String {
    match latency {
        Reading::Value(ms) => format!("{} ms", ms),
        Reading::Unavailable => "N/A".to_string(),
    }
}

pub fn format_temperature(temperature: &Reading<f32>) -> String {
    match temperature {
        Reading::Value(celsius) => format!("{:.0}°C", celsius),
        Reading::Unavailable => "N/A".to_string(),
    }
}

pub fn format_percent(reading: &Reading<f32>) -> String {
    match reading {
        Reading::Value(percent) => format!("{:.1}%", percent),
        Reading::Unavailable => "N/A".to_string(),
    }
}

pub fn format_battery(battery_percent: Option<f32>) -> String {
    match battery_percent {
        Some(percent) => format!("{:.0}%", percent),
        None => "No battery".to_string(),
    }
}

/// `L: <local> | P: <public>`
pub fn format_identity(identity: &NetworkIdentity) -> String {
    format!(
        "L: {} | P: {}",
        identity.local_address, identity.public_address
    )
}

pub fn format_gpu(gpu: &GpuSample) -> String {
    format!(
        "{} {} | {} | VRAM {}",
        gpu.name,
        format_percent(&gpu.utilization_percent),
        format_temperature(&gpu.temperature_celsius),
        format_percent(&gpu.vram_percent)
    )
}

fn colorize_load(text: String, value: f32, threshold: f32) -> ColoredString {
    if value > threshold {
        text.red().bold()
    } else if value > threshold * 0.75 {
        text.yellow()
    } else {
        text.green()
    }
}

/// One status line per snapshot, used by `watch`
pub fn format_snapshot_line(snapshot: &Snapshot, thresholds: &AlertThresholds) -> String {
    let cpu = colorize_load(
        format!("{:5.1}%", snapshot.cpu_percent),
        snapshot.cpu_percent,
        thresholds.for_metric(Metric::Cpu),
    );
    let ram = colorize_load(
        format!("{:5.1}%", snapshot.ram_percent),
        snapshot.ram_percent,
        thresholds.for_metric(Metric::Ram),
    );

    let mut line = format!(
        "{} CPU {} {} | RAM {} ({}) | Ping {}",
        snapshot.timestamp.format("%H:%M:%S").to_string().dimmed(),
        cpu,
        format_temperature(&snapshot.cpu_temp_celsius),
        ram,
        format_ram_usage(snapshot.ram_used_bytes, snapshot.ram_total_bytes),
        format_latency(&snapshot.latency_ms)
    );

    if let Some(gpu) = &snapshot.gpu {
        line.push_str(&format!(" | GPU {}", format_gpu(gpu)));
    }

    line
}

/// Multi-line report for the `snapshot` command
pub fn print_snapshot(snapshot: &Snapshot) {
    println!("\n{}", "SYSTEM SNAPSHOT".bold().bright_cyan());
    println!("{}", "=".repeat(60));

    println!(
        "{:<12} {:.1}%  ({})",
        "CPU:".white().bold(),
        snapshot.cpu_percent,
        format_temperature(&snapshot.cpu_temp_celsius)
    );
    println!(
        "{:<12} {:.1}%  ({})",
        "RAM:".white().bold(),
        snapshot.ram_percent,
        format_ram_usage(snapshot.ram_used_bytes, snapshot.ram_total_bytes)
    );

    match &snapshot.gpu {
        Some(gpu) => println!("{:<12} {}", "GPU:".white().bold(), format_gpu(gpu)),
        None => println!("{:<12} {}", "GPU:".white().bold(), "Not detected".dimmed()),
    }

    println!(
        "{:<12} {}",
        "Battery:".white().bold(),
        format_battery(snapshot.battery_percent)
    );
    println!(
        "{:<12} {}",
        "Network:".white().bold(),
        format_identity(&snapshot.network)
    );
    println!(
        "{:<12} {}",
        "Latency:".white().bold(),
        format_latency(&snapshot.latency_ms)
    );

    if !snapshot.disks.is_empty() {
        println!("\n{}", "DISKS".bold().bright_cyan());
        for disk in &snapshot.disks {
            println!(
                "  {:<20} {:>10}  {:5.1}% used",
                disk.mount_point,
                format_size(disk.total_bytes),
                disk.used_percent
            );
        }
    }
    println!();
}

pub fn format_risk(risk: ProcessRisk) -> ColoredString {
    match risk {
        ProcessRisk::System => "System".red(),
        ProcessRisk::HighLoad => "High Load (Kill?)".yellow().bold(),
        ProcessRisk::Safe => "Safe".green(),
    }
}

pub fn print_process_table(processes: &[ProcessEntry]) {
    println!(
        "{:>8}  {:<28} {:>7} {:>10}  {}",
        "PID".bold(),
        "NAME".bold(),
        "CPU".bold(),
        "MEMORY".bold(),
        "RISK".bold()
    );

    for process in processes {
        let mut name = process.name.clone();
        if name.chars().count() > 28 {
            name = name.chars().take(27).collect::<String>() + "…";
        }

        println!(
            "{:>8}  {:<28} {:>6.1}% {:>10}  {}",
            process.pid,
            name,
            process.cpu_percent,
            format_size(process.memory_bytes),
            format_risk(process.risk)
        );
    }
}

pub type InfoSection = (&'static str, Vec<(String, String)>);

/// Titled label/value rows for `syspulse info`
pub fn system_info_sections(info: &SystemInfo) -> Vec<InfoSection> {
    let row = |label: &str, value: String| (label.to_string(), value);
    let na = || "N/A".to_string();

    let os = vec![
        row("OS", format!("{} {}", info.os.name, info.os.release)),
        row("Build", info.os.build.clone()),
        row("Architecture", info.os.architecture.clone()),
        row("Node Name", info.os.node_name.clone()),
        row(
            "Boot Time",
            info.os
                .boot_time
                .map(|time| time.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(na),
        ),
    ];

    let cpu = vec![
        row("Processor", info.cpu.processor.clone()),
        row(
            "Physical Cores",
            info.cpu
                .physical_cores
                .map(|cores| cores.to_string())
                .unwrap_or_else(na),
        ),
        row("Total Threads", info.cpu.threads.to_string()),
        row("Max Frequency", format_frequency(info.cpu.max_frequency_mhz)),
    ];

    let memory = vec![
        row("Total RAM", format_gb_precise(info.memory.total_bytes)),
        row("Available", format_gb_precise(info.memory.available_bytes)),
        row("Swap Total", format_gb_precise(info.memory.swap_total_bytes)),
    ];

    let gpu = vec![row(
        "Active GPU",
        info.gpu_name.clone().unwrap_or_else(na),
    )];

    let network = info
        .network_adapters
        .iter()
        .map(|adapter| (adapter.name.clone(), adapter.ipv4.clone()))
        .collect();

    vec![
        ("Operating System", os),
        ("Processor (CPU)", cpu),
        ("Memory (RAM)", memory),
        ("Graphics (GPU)", gpu),
        ("Network Adapters", network),
    ]
}

pub fn print_system_info(info: &SystemInfo) {
    println!("\n{}", "SYSTEM INFORMATION".bold().bright_cyan());
    println!("{}", "=".repeat(60));

    for (title, rows) in system_info_sections(info) {
        println!("\n{}", title.bold().bright_cyan());
        if rows.is_empty() {
            println!("  {}", "None".dimmed());
        }
        for (label, value) in rows {
            println!("  {:<16} {}", format!("{}:", label).white().bold(), value);
        }
    }
    println!();
}
