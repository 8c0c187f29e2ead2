//! 终端评分界面
//!
//! 基于 dialoguer 的菜单交互。图片本身无法在终端中显示，只给出文件路径。

use anyhow::Result;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};

use crate::models::{RaterSelection, Score, ScoreRecord};
use crate::orchestrator::{
    Checkpoint, Delivery, Outcome, RaterAction, RecoveryChoice, RecoveryOffer, Screen,
    SessionView,
};
use crate::services::NotificationKind;
use crate::utils::logging::truncate_text;

const PROGRESS_WIDTH: usize = 30;

/// 终端评分界面
pub struct TerminalUi {
    theme: ColorfulTheme,
}

impl TerminalUi {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }

    pub fn show_title(&self) {
        println!("gScorer v0.1 - Graft Image Scoring");
        println!();
    }

    /// 选择评分人：固定菜单 + 手动输入
    pub fn select_rater(&self, names: &[String]) -> Result<RaterSelection> {
        let mut items: Vec<String> = names.to_vec();
        items.push(RaterSelection::OTHER_LABEL.to_string());

        let idx = Select::with_theme(&self.theme)
            .with_prompt("Select your name to begin scoring")
            .items(&items)
            .default(0)
            .interact()?;

        if idx < names.len() {
            return Ok(RaterSelection::Listed(names[idx].clone()));
        }

        let custom: String = Input::with_theme(&self.theme)
            .with_prompt("Please enter your name")
            .allow_empty(true)
            .interact_text()?;
        Ok(RaterSelection::Other(custom))
    }

    /// 询问是否继续上次的会话
    pub fn offer_recovery(&self, offer: &RecoveryOffer) -> Result<RecoveryChoice> {
        println!("Previous Session Recovered for {}.", offer.rater());
        let items = [
            format!(
                "Continue from previous session for {} ({} scored)",
                offer.rater(),
                offer.scored()
            ),
            "Start a new session (discard previous)".to_string(),
        ];
        let idx = Select::with_theme(&self.theme)
            .items(&items)
            .default(0)
            .interact()?;
        Ok(if idx == 0 {
            RecoveryChoice::Continue
        } else {
            RecoveryChoice::Discard
        })
    }

    /// 显示评分人和进度条
    pub fn render_header(&self, view: &SessionView) {
        let filled = (view.progress * PROGRESS_WIDTH as f64).round() as usize;
        let filled = filled.min(PROGRESS_WIDTH);
        println!();
        println!("Author: {}", view.rater);
        println!(
            "[{}{}] Progress: {}/{} images scored",
            "#".repeat(filled),
            "-".repeat(PROGRESS_WIDTH - filled),
            view.scored,
            view.total
        );
    }

    /// 根据当前界面询问下一步操作
    ///
    /// 返回 `None` 表示本次运行结束（全部完成或评分人选择了停止）
    pub fn prompt_action(&self, view: &SessionView) -> Result<Option<RaterAction>> {
        match &view.screen {
            Screen::ChooseBatch { paused: true, .. } => {
                println!("Finished for now. Your progress is saved; come back any time.");
                Ok(None)
            }
            Screen::ChooseBatch { options, .. } => {
                let labels: Vec<String> = options.iter().map(|o| o.label()).collect();
                let idx = Select::with_theme(&self.theme)
                    .with_prompt("How many images can you score right now?")
                    .items(&labels)
                    .default(0)
                    .interact()?;
                Ok(Some(RaterAction::ChooseBatch(options[idx].size())))
            }
            Screen::Rate {
                image,
                image_path,
                guide_image,
                batch_end,
            } => {
                println!(
                    "Image {} of {} (this batch ends at {}): {}",
                    view.scored + 1,
                    view.total,
                    batch_end,
                    image
                );
                println!("  file:  {}", image_path.display());
                println!("  guide: {}", guide_image.display());
                let labels: Vec<&str> = Score::ALL.iter().map(|s| s.label()).collect();
                let idx = Select::with_theme(&self.theme)
                    .with_prompt("Select a score for this image")
                    .items(&labels)
                    .default(0)
                    .interact()?;
                Ok(Some(RaterAction::Score(Score::ALL[idx])))
            }
            Screen::BatchClosed { batch_size } => {
                println!("Batch of {} images scored!", batch_size);
                let items = ["Another 50? Please?", "Finish & Email Results"];
                let idx = Select::with_theme(&self.theme)
                    .items(&items)
                    .default(0)
                    .interact()?;
                Ok(Some(if idx == 0 {
                    RaterAction::AnotherBatch
                } else {
                    RaterAction::Stop
                }))
            }
            Screen::Complete { records } => {
                if view.total == 0 {
                    println!("No images to score.");
                } else {
                    println!("All images scored!");
                    self.show_table(records);
                }
                Ok(None)
            }
        }
    }

    pub fn show_outcome(&self, outcome: &Outcome) {
        if let Some(record) = &outcome.recorded {
            println!("Scored {}: {}", record.image, record.score.label());
        }
        if let Some(checkpoint) = &outcome.checkpoint {
            self.show_checkpoint(checkpoint);
        }
    }

    pub fn show_checkpoint(&self, checkpoint: &Checkpoint) {
        if let Some(path) = &checkpoint.export_path {
            println!("Scores saved to {}", path.display());
        }
        if checkpoint.delivery == Delivery::Sent {
            match checkpoint.kind {
                NotificationKind::Batch => println!("Batch results have been emailed."),
                NotificationKind::Final => println!("Results have been emailed."),
            }
        }
        for warning in checkpoint.warnings() {
            self.show_warning(&warning);
        }
    }

    pub fn show_warning(&self, message: &str) {
        eprintln!("⚠️  {}", message);
    }

    /// 评分表
    pub fn show_table(&self, records: &[ScoreRecord]) {
        let width = records
            .iter()
            .map(|r| r.image.chars().count())
            .max()
            .unwrap_or(5)
            .clamp(5, 40);
        println!("{:<width$}  {:>5}  {}", "image", "score", "timestamp", width = width);
        for record in records {
            println!(
                "{:<width$}  {:>5}  {}",
                truncate_text(&record.image, width),
                record.score.value(),
                record.timestamp,
                width = width
            );
        }
    }
}

impl Default for TerminalUi {
    fn default() -> Self {
        Self::new()
    }
}
