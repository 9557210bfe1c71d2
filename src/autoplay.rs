use log::Level::Info;
use std::time::Duration;
use tokio::time::sleep;

use crate::controller::ThemeController;
use crate::theme::PresetId;
use crate::theme_log;

const AUTOPLAY_INTERVAL: Duration = Duration::from_secs(6);

/// Every sixth step asks for an AI theme instead of the next preset.
const AI_EVERY: usize = 6;

pub async fn start_autoplay(controller: ThemeController) {
    theme_log!(Info, "Autoplay enabled, cycling every {:?}", AUTOPLAY_INTERVAL);
    tokio::spawn(async move {
        let mut step = 0usize;
        loop {
            sleep(AUTOPLAY_INTERVAL).await;
            if step % AI_EVERY == AI_EVERY - 1 {
                controller.generate_and_apply_ai_theme().await;
            } else {
                let preset = PresetId::ALL[step % PresetId::ALL.len()];
                controller.switch_to_preset(preset.name()).await;
            }
            step += 1;
        }
    });
}
