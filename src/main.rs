use anyhow::Result;
use gscorer::utils::logging;
use gscorer::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志（日志路径只来自环境变量）
    let env_config = Config::from_env();
    logging::init(&env_config.log_file, env_config.verbose_logging)?;

    // 加载配置（含 secrets 文件）
    let config = Config::load()?;

    // 初始化并运行应用
    App::initialize(config).await?.run().await?;

    Ok(())
}
