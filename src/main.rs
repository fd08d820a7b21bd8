use actix::prelude::*;
use anyhow::Context;
use clap::Parser;
use pakdown::cli::Args;
use pakdown::core::{ProgressObserver, SequenceRunner, SilentProgress, TransferEngine};
use pakdown::ui::{print_error, print_success, ConsoleProgress};
use pakdown::utils::logger::FailureLogActor;

#[actix::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_filter()))
        .init();
    log::info!(
        "pakdown {} (构建时间 {})",
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_BUILD_TIMESTAMP")
    );

    // 配置有误时不下载任何文件，正常退出
    let config = match args.load_config() {
        Ok(config) => config,
        Err(e) => {
            log::error!("配置加载失败: {}", e);
            eprintln!("Error while reading config file: {}", e);
            return Ok(());
        }
    };

    log::info!("配置文件路径: {}", args.config);
    println!("{}", config.get_summary());

    let failure_log = FailureLogActor::new(&config.log_file).start();
    let engine = TransferEngine::from_config(&config, failure_log);
    let observer: Box<dyn ProgressObserver> = if args.quiet {
        Box::new(SilentProgress)
    } else {
        Box::new(ConsoleProgress::new())
    };

    let mut runner = SequenceRunner::new(engine, observer).with_max_retries(config.max_retries);
    let summary = runner
        .run(config.from, config.to, &config.output_root(), &config.base_url)
        .await
        .context("下载过程出错")?;

    print!("{}", summary);
    if summary.is_clean() {
        print_success(&format!("全部 {} 个文件下载完成", summary.completed));
    } else {
        print_error(&format!(
            "{} 个文件下载失败（重试耗尽 {} 个已记录到 {}）",
            summary.failed_count(),
            summary.exhausted,
            config.log_file
        ));
    }

    log::info!(
        "下载完成 - 成功: {}, 失败: {}",
        summary.completed,
        summary.failed_count()
    );
    Ok(())
}
