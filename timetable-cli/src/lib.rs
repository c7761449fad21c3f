//! Command line front end for the timetable engine.

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "timetable")]
#[command(about = "重复事件时间表展开工具")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 启用详细日志
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 展开配置文件中的所有配置并输出时间表
    Expand {
        /// 配置文件路径（JSON，单个对象或数组）
        file: PathBuf,

        /// 每个配置最多展开的条目数
        #[arg(short, long)]
        limit: Option<i64>,

        /// 引擎设置文件路径（JSON）
        #[arg(short, long)]
        settings: Option<PathBuf>,

        /// 以JSON格式输出
        #[arg(long)]
        json: bool,

        /// 输出文件路径
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 只检查配置中的日期和时间范围
    Validate {
        /// 配置文件路径
        file: PathBuf,
    },
}
