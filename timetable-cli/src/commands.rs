use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveTime;
use timetable_core::prelude::*;

/// 展开命令参数
pub struct ExpandParams {
    pub file: PathBuf,
    pub limit: Option<i64>,
    pub settings: Option<PathBuf>,
    pub json: bool,
    pub output: Option<PathBuf>,
}

/// 展开命令
pub fn expand_command(params: ExpandParams) -> Result<()> {
    let configurations = Configuration::list_from_path(&params.file)?;

    let mut settings = match params.settings {
        Some(ref path) => Settings::from_path(path)?,
        None => Settings::from_env()?,
    };
    if let Some(limit) = params.limit {
        settings.frequency_limit_per_item = Some(limit);
    }

    tracing::info!(
        "开始展开时间表: 文件={}, 配置数={}, 条目上限={}",
        params.file.display(),
        configurations.len(),
        settings.frequency_limit_per_item()
    );

    let sink = CollectingWarningSink::new();
    let generator = TimeTableGenerator::default()
        .with_sink(sink.clone())
        .with_config(settings);

    let mut times = TimeTable::new();
    for configuration in &configurations {
        generator.handle_configuration(&mut times, configuration);
    }

    let content = if params.json {
        let entries: Vec<&TimeEntry> = times.values().collect();
        serde_json::to_string_pretty(&entries)?
    } else {
        times
            .values()
            .map(format_entry)
            .collect::<Vec<_>>()
            .join("\n")
    };

    match params.output {
        Some(path) => {
            fs::write(&path, content)
                .with_context(|| format!("无法写入输出文件 {}", path.display()))?;
            println!("✓ 已生成 {} 个时间条目: {}", times.len(), path.display());
        }
        None => println!("{content}"),
    }

    for notification in sink.notifications() {
        eprintln!(
            "⚠ [{}] {}: {}",
            notification.severity.label(),
            notification.title,
            notification.message
        );
    }

    Ok(())
}

/// 检查命令，发现问题时返回错误
pub fn validate_command(file: PathBuf) -> Result<()> {
    let configurations = Configuration::list_from_path(&file)?;
    let mut problems = 0;

    for (index, configuration) in configurations.iter().enumerate() {
        let entry = TimeEntry::from_configuration(configuration);
        if let Some(warning) = validate_base_entry(&entry) {
            problems += 1;
            println!(
                "✗ 配置 #{} (pid={}): {} - {}",
                index + 1,
                configuration.pid,
                warning.title(),
                warning.message()
            );
        }
    }

    if problems > 0 {
        anyhow::bail!("{} 个配置存在问题", problems);
    }

    println!("✓ {} 个配置检查通过", configurations.len());
    Ok(())
}

/// 单行显示一个时间条目
pub fn format_entry(entry: &TimeEntry) -> String {
    let date = |value: Option<chrono::NaiveDate>| {
        value.map_or_else(|| "????-??-??".to_string(), |date| date.to_string())
    };
    let time = |value: Option<u32>| {
        value
            .and_then(|seconds| {
                NaiveTime::from_num_seconds_from_midnight_opt(seconds % SECONDS_DAY, 0)
            })
            .map(|time| format!(" {}", time.format("%H:%M:%S")))
            .unwrap_or_default()
    };

    let all_day = if entry.all_day { " (全天)" } else { "" };
    format!(
        "{}{} → {}{}{} [{}] pid={}",
        date(entry.start_date),
        time(entry.start_time),
        date(entry.end_date),
        time(entry.end_time),
        all_day,
        entry.state,
        entry.pid
    )
}
