//! mdtrans 命令行入口

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use markdown_relay_translator::{
    batch, DocumentKind, OllamaClient, Relinker, TranslationLibConfig, TranslationService,
};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// 使用本地大模型翻译 Markdown 文档树
#[derive(Parser, Debug)]
#[command(name = "mdtrans", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 翻译原文目录中尚未翻译（或译文为空）的文件
    Translate {
        /// 原文目录，默认取配置文件中的 paths.source_dir
        #[arg(short, long)]
        source: Option<PathBuf>,
        /// 译文目录，默认取配置文件中的 paths.target_dir
        #[arg(short, long)]
        target: Option<PathBuf>,
        /// 按目录文档（SUMMARY.md）的方式分块和恢复缩进
        #[arg(short, long)]
        navigation: bool,
        /// 配置文件路径
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// 重写译文中的锚点链接，输出到替换目录段后的新目录
    Relink {
        #[arg(short, long)]
        source: Option<PathBuf>,
        #[arg(short, long)]
        target: Option<PathBuf>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// 生成示例配置文件
    InitConfig {
        #[arg(default_value = "translation-config.toml")]
        path: PathBuf,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<TranslationLibConfig> {
    match path {
        Some(path) => TranslationLibConfig::from_file(path)
            .with_context(|| format!("无法加载配置文件 {}", path.display())),
        None => Ok(TranslationLibConfig::load_from_default_locations()),
    }
}

async fn run_translate(
    source: Option<PathBuf>,
    target: Option<PathBuf>,
    navigation: bool,
    config: Option<PathBuf>,
) -> Result<()> {
    let config = load_config(config.as_ref())?;
    let source = source.unwrap_or_else(|| config.paths.source_dir.clone());
    let target = target.unwrap_or_else(|| config.paths.target_dir.clone());
    let kind = DocumentKind::from_navigation_flag(navigation);

    info!("开始处理:");
    info!("源路径: {}", source.display());
    info!("目标路径: {}", target.display());

    if !source.exists() {
        bail!("源路径不存在: {}", source.display());
    }

    batch::find_large_files(&source, config.chunking.single_unit_threshold)?;
    let scan = batch::scan_pending(&source, &target)?;
    if scan.pending.is_empty() {
        info!("所有文件都已翻译完成！");
        return Ok(());
    }

    let service = TranslationService::new(OllamaClient::new(&config.translation), &config)?;
    batch::translate_tree(&service, &source, &target, &scan.pending, kind).await;
    Ok(())
}

fn run_relink(
    source: Option<PathBuf>,
    target: Option<PathBuf>,
    config: Option<PathBuf>,
) -> Result<()> {
    let config = load_config(config.as_ref())?;
    let source = source.unwrap_or_else(|| config.paths.source_dir.clone());
    let target = target.unwrap_or_else(|| config.paths.target_dir.clone());

    if !source.exists() {
        bail!("源路径不存在: {}", source.display());
    }

    let relinker = Relinker::new(&config.paths)?;
    let summary = batch::relink_tree(&relinker, &source, &target)?;
    if !summary.mismatched.is_empty() {
        bail!("{} 个文件的标题数量与原文不一致", summary.mismatched.len());
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Translate { source, target, navigation, config } => {
            run_translate(source, target, navigation, config).await
        }
        Commands::Relink { source, target, config } => run_relink(source, target, config),
        Commands::InitConfig { path } => TranslationLibConfig::generate_example_config(&path)
            .map(|_| info!("已生成示例配置: {}", path.display()))
            .map_err(Into::into),
    };

    if let Err(e) = result {
        error!("错误: {:#}", e);
        std::process::exit(1);
    }
}
