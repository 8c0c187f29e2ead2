use crate::error::{AppError, AppResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// 邮件中继配置（来自 secrets 文件）
#[derive(Clone, Debug)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// 发件人显示名称
    pub sender_name: String,
}

/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 待评分图片目录
    pub image_dir: PathBuf,
    /// 评分参考图
    pub guide_image: PathBuf,
    /// 缓存与导出文件目录
    pub output_dir: PathBuf,
    /// 评分人菜单
    pub rater_names: Vec<String>,
    /// secrets 文件路径
    pub secrets_file: PathBuf,
    /// 结果接收邮箱
    pub recipient: Option<String>,
    pub smtp: Option<SmtpConfig>,
    /// 通知发送超时（秒）
    pub notify_timeout_secs: u64,
    /// 固定随机种子（用于复现打乱顺序）
    pub shuffle_seed: Option<u64>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            image_dir: PathBuf::from("raw_img"),
            guide_image: PathBuf::from("gScoreGuide.png"),
            output_dir: PathBuf::from("gScorer-output"),
            rater_names: ["Fadi", "Joanna", "Helen", "George", "Naeem", "Audrey"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            secrets_file: PathBuf::from("secrets.toml"),
            recipient: None,
            smtp: None,
            notify_timeout_secs: 30,
            shuffle_seed: None,
            verbose_logging: false,
            log_file: PathBuf::from("gscorer.log"),
        }
    }
}

/// secrets 文件内容，键名与部署环境保持一致
#[derive(Debug, Default, Deserialize)]
struct Secrets {
    #[serde(rename = "SMTP_SERVER")]
    smtp_server: Option<String>,
    #[serde(rename = "SMTP_PORT")]
    smtp_port: Option<toml::Value>,
    #[serde(rename = "SMTP_USER")]
    smtp_user: Option<String>,
    #[serde(rename = "SMTP_PASSWORD")]
    smtp_password: Option<String>,
    #[serde(rename = "SENDER_NAME")]
    sender_name: Option<String>,
    #[serde(rename = "RECIPIENT_EMAIL")]
    recipient_email: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            image_dir: std::env::var("GSCORER_IMAGE_DIR").map(PathBuf::from).unwrap_or(default.image_dir),
            guide_image: std::env::var("GSCORER_GUIDE_IMAGE").map(PathBuf::from).unwrap_or(default.guide_image),
            output_dir: std::env::var("GSCORER_OUTPUT_DIR").map(PathBuf::from).unwrap_or(default.output_dir),
            rater_names: std::env::var("GSCORER_RATERS")
                .ok()
                .map(|v| v.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect())
                .unwrap_or(default.rater_names),
            secrets_file: std::env::var("GSCORER_SECRETS").map(PathBuf::from).unwrap_or(default.secrets_file),
            recipient: std::env::var("RECIPIENT_EMAIL").ok().or(default.recipient),
            smtp: default.smtp,
            notify_timeout_secs: std::env::var("NOTIFY_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.notify_timeout_secs),
            shuffle_seed: std::env::var("SHUFFLE_SEED").ok().and_then(|v| v.parse().ok()).or(default.shuffle_seed),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            log_file: std::env::var("GSCORER_LOG_FILE").map(PathBuf::from).unwrap_or(default.log_file),
        }
    }

    /// 读取环境变量，再合并 secrets 文件中的邮件配置
    pub fn load() -> AppResult<Self> {
        let mut config = Self::from_env();
        let secrets_file = config.secrets_file.clone();
        config.apply_secrets_file(&secrets_file)?;
        Ok(config)
    }

    /// 合并 secrets 文件；文件不存在时保持原样
    pub fn apply_secrets_file(&mut self, path: &Path) -> AppResult<()> {
        if !path.exists() {
            tracing::warn!("未找到 secrets 文件: {}，邮件通知将不可用", path.display());
            return Ok(());
        }

        let content = std::fs::read_to_string(path)?;
        let secrets: Secrets = toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("无法解析 {}: {}", path.display(), e)))?;

        if self.recipient.is_none() {
            self.recipient = secrets.recipient_email.clone();
        }
        self.smtp = secrets.into_smtp()?;
        Ok(())
    }
}

impl Secrets {
    fn into_smtp(self) -> AppResult<Option<SmtpConfig>> {
        let (Some(host), Some(user), Some(password)) =
            (self.smtp_server, self.smtp_user, self.smtp_password)
        else {
            return Ok(None);
        };

        // 端口既可能写成整数，也可能写成字符串
        let port = match self.smtp_port {
            None => 587,
            Some(toml::Value::Integer(p)) => u16::try_from(p)
                .map_err(|_| AppError::Config(format!("SMTP_PORT 超出范围: {}", p)))?,
            Some(toml::Value::String(s)) => s
                .trim()
                .parse()
                .map_err(|_| AppError::Config(format!("SMTP_PORT 无法解析: {}", s)))?,
            Some(other) => {
                return Err(AppError::Config(format!("SMTP_PORT 类型错误: {}", other)));
            }
        };

        let sender_name = self.sender_name.unwrap_or_else(|| "gScorer".to_string());

        Ok(Some(SmtpConfig {
            host,
            port,
            user,
            password,
            sender_name,
        }))
    }
}
