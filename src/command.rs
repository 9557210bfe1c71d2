//! Line-based control protocol mapping the page's buttons to operations.
//!
//! One command per line, one response line back: `OK ...` or `ERR <reason>`.
//! Theme transitions are spawned, so a response never waits on their timers.

use log::Level::{Debug, Info, Warn};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{Mutex, watch};

use crate::command_log;
use crate::controller::ThemeController;
use crate::decor::Viewport;
use crate::decor::reveal::{RevealRegistry, orb_parallax};
use crate::decor::showcase::{RANDOM_MODEL_THEME_NAME, Showcase};
use crate::surface::announce;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Raw identifier; unknown presets are ignored by the controller.
    Preset(String),
    AiTheme,
    ToggleMode,
    ToggleRotation,
    RandomizeModel,
    Swatches,
    Status,
    Resize { width: f32, height: f32 },
    Scroll(f32),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command: {0}")]
    Unknown(String),

    #[error("missing argument for {0}")]
    MissingArgument(&'static str),

    #[error("unexpected argument: {0}")]
    UnexpectedArgument(String),

    #[error("invalid number: {0}")]
    InvalidNumber(String),
}

/// Non-negative finite number argument of `command`.
fn number(token: Option<&str>, command: &'static str) -> Result<f32, CommandError> {
    let token = token.ok_or(CommandError::MissingArgument(command))?;
    token
        .parse::<f32>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
        .ok_or_else(|| CommandError::InvalidNumber(token.to_string()))
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut tokens = line.split_whitespace();
        let name = tokens.next().ok_or(CommandError::Empty)?;
        let command = match name {
            "preset" => {
                let id = tokens.next().ok_or(CommandError::MissingArgument("preset"))?;
                Command::Preset(id.to_string())
            }
            "ai" => Command::AiTheme,
            "toggle" => Command::ToggleMode,
            "rotate" => Command::ToggleRotation,
            "randomize-model" => Command::RandomizeModel,
            "swatches" => Command::Swatches,
            "status" => Command::Status,
            "resize" => Command::Resize {
                width: number(tokens.next(), "resize")?,
                height: number(tokens.next(), "resize")?,
            },
            "scroll" => Command::Scroll(number(tokens.next(), "scroll")?),
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        match tokens.next() {
            Some(extra) => Err(CommandError::UnexpectedArgument(extra.to_string())),
            None => Ok(command),
        }
    }
}

/// Everything a command can reach.
pub struct CommandContext {
    pub controller: ThemeController,
    pub showcase: Arc<Mutex<Showcase>>,
    /// Read by the frame loop; resizes reach the renderers through it.
    pub viewport: watch::Sender<Viewport>,
    pub reveals: Arc<Mutex<RevealRegistry>>,
}

impl CommandContext {
    pub fn new(
        controller: ThemeController,
        showcase: Arc<Mutex<Showcase>>,
        viewport: watch::Sender<Viewport>,
        reveals: Arc<Mutex<RevealRegistry>>,
    ) -> Self {
        Self {
            controller,
            showcase,
            viewport,
            reveals,
        }
    }

    pub async fn execute(&self, command: Command) -> String {
        command_log!(Debug, "executing {command:?}");
        match command {
            Command::Preset(id) => {
                let controller = self.controller.clone();
                tokio::spawn(async move { controller.switch_to_preset(&id).await });
                "OK".to_string()
            }
            Command::AiTheme => {
                let controller = self.controller.clone();
                tokio::spawn(async move { controller.generate_and_apply_ai_theme().await });
                "OK".to_string()
            }
            Command::ToggleMode => {
                let controller = self.controller.clone();
                tokio::spawn(async move { controller.toggle_light_dark_mode().await });
                "OK".to_string()
            }
            Command::ToggleRotation => {
                let label = self.showcase.lock().await.toggle_rotation();
                format!("OK {}", label.text())
            }
            Command::RandomizeModel => {
                // Use a local SmallRng for Send safety
                let mut rng = SmallRng::from_entropy();
                let colors = self.showcase.lock().await.randomize_colors(&mut rng);
                announce(
                    self.controller.surface(),
                    RANDOM_MODEL_THEME_NAME,
                    self.controller.timings(),
                )
                .await;
                format!("OK {} {} {}", colors.primary, colors.secondary, colors.accent)
            }
            Command::Swatches => {
                let swatches = self.controller.surface().lock().await.swatches();
                format!(
                    "OK primary={} secondary={} accent={} background={} text={}",
                    swatches.primary,
                    swatches.secondary,
                    swatches.accent,
                    swatches.background,
                    swatches.text
                )
            }
            Command::Status => {
                let active = self.controller.active_theme().await;
                let phase = self.controller.phase().await;
                format!("OK {} {:?}", active.label(), phase)
            }
            Command::Resize { width, height } => {
                self.viewport.send_modify(|viewport| {
                    viewport.width = width;
                    viewport.height = height;
                });
                command_log!(Info, "Viewport resized to {width}x{height}");
                "OK".to_string()
            }
            Command::Scroll(scroll_y) => {
                self.viewport.send_modify(|viewport| viewport.scroll_y = scroll_y);
                let viewport_height = self.viewport.borrow().height;
                let orb = orb_parallax(scroll_y);
                let mut reveals = self.reveals.lock().await;
                let started: Vec<&str> = reveals
                    .on_scroll(scroll_y, viewport_height)
                    .into_iter()
                    .map(|target| target.element.as_str())
                    .collect();
                format!(
                    "OK orb={:.1}/{:.3} revealed=[{}]",
                    orb.translate_y,
                    orb.scale,
                    started.join(", ")
                )
            }
        }
    }

    pub async fn handle_line(&self, line: &str) -> String {
        match line.parse::<Command>() {
            Ok(command) => self.execute(command).await,
            Err(e) => {
                command_log!(Warn, "rejected {line:?}: {e}");
                format!("ERR {e}")
            }
        }
    }
}

pub async fn serve(listener: TcpListener, context: Arc<CommandContext>) -> std::io::Result<()> {
    command_log!(Info, "Command listener on {}", listener.local_addr()?);
    loop {
        let (stream, peer) = listener.accept().await?;
        command_log!(Debug, "connection from {peer}");
        let context = context.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, &context).await {
                command_log!(Warn, "connection from {peer} failed: {e}");
            }
        });
    }
}

async fn handle_connection(stream: TcpStream, context: &CommandContext) -> std::io::Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let mut response = context.handle_line(&line).await;
        response.push('\n');
        writer.write_all(response.as_bytes()).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::decor::ScrollRevealer;
    use crate::decor::reveal::page_targets;
    use crate::surface::StyleSurface;
    use crate::theme::{ActiveTheme, PresetId};
    use std::time::Duration;

    fn context() -> CommandContext {
        let config = Config::default();
        let presets = Arc::new(config.preset_table());
        let surface = StyleSurface::new(presets.clone(), config.page.cards).shared();
        let controller =
            ThemeController::with_rng(&config, presets, surface, SmallRng::seed_from_u64(5));
        let showcase = Showcase::new(&crate::theme::ColorTriad {
            primary: "#6c63ff".to_string(),
            secondary: "#ff6584".to_string(),
            accent: "#43e97b".to_string(),
        });
        let (viewport, _) = watch::channel(Viewport::new(1280.0, 720.0));
        let mut reveals = RevealRegistry::default();
        reveals.observe(&page_targets());
        CommandContext::new(
            controller,
            Arc::new(Mutex::new(showcase)),
            viewport,
            Arc::new(Mutex::new(reveals)),
        )
    }

    #[test]
    fn parses_commands() {
        assert_eq!("preset dark".parse::<Command>(), Ok(Command::Preset("dark".to_string())));
        assert_eq!("  ai ".parse::<Command>(), Ok(Command::AiTheme));
        assert_eq!("randomize-model".parse::<Command>(), Ok(Command::RandomizeModel));
        assert_eq!("".parse::<Command>(), Err(CommandError::Empty));
        assert_eq!("preset".parse::<Command>(), Err(CommandError::MissingArgument("preset")));
        assert_eq!(
            "toggle now".parse::<Command>(),
            Err(CommandError::UnexpectedArgument("now".to_string()))
        );
        assert_eq!(
            "set_mode Road".parse::<Command>(),
            Err(CommandError::Unknown("set_mode".to_string()))
        );
        assert_eq!(
            "resize 800 600".parse::<Command>(),
            Ok(Command::Resize { width: 800.0, height: 600.0 })
        );
        assert_eq!("resize 800".parse::<Command>(), Err(CommandError::MissingArgument("resize")));
        assert_eq!(
            "scroll -5".parse::<Command>(),
            Err(CommandError::InvalidNumber("-5".to_string()))
        );
        assert_eq!(
            "scroll NaN".parse::<Command>(),
            Err(CommandError::InvalidNumber("NaN".to_string()))
        );
    }

    #[tokio::test]
    async fn resize_updates_the_shared_viewport() {
        let context = context();
        let mut frames = context.viewport.subscribe();
        assert_eq!(context.handle_line("resize 800 600").await, "OK");
        assert!(frames.has_changed().unwrap());
        let viewport = *frames.borrow_and_update();
        assert_eq!((viewport.width, viewport.height), (800.0, 600.0));
    }

    #[tokio::test]
    async fn scroll_moves_the_orb_and_plays_reveals_once() {
        let context = context();
        assert_eq!(
            context.handle_line("scroll 0").await,
            "OK orb=0.0/1.000 revealed=[.hero-content h2, .hero-content p, .theme-controls]"
        );
        assert_eq!(
            context.handle_line("scroll 500").await,
            "OK orb=50.0/0.950 revealed=[.features .card]"
        );
        assert_eq!(context.handle_line("scroll 0").await, "OK orb=0.0/1.000 revealed=[]");
        assert_eq!(context.viewport.borrow().scroll_y, 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn preset_command_runs_in_background() {
        let context = context();
        assert_eq!(context.handle_line("preset theme-neon").await, "OK");
        assert_eq!(context.controller.active_theme().await, ActiveTheme::Unset);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(
            context.controller.active_theme().await,
            ActiveTheme::Preset(PresetId::Neon)
        );
        assert_eq!(context.handle_line("status").await, "OK theme-neon Idle");
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_preset_still_answers_ok() {
        let context = context();
        assert_eq!(context.handle_line("preset sepia").await, "OK");
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(context.controller.active_theme().await, ActiveTheme::Unset);
    }

    #[tokio::test(start_paused = true)]
    async fn randomize_model_leaves_page_theme_alone() {
        let context = context();
        let response = context.handle_line("randomize-model").await;
        assert!(response.starts_with("OK hsl("), "{response}");
        assert_eq!(context.controller.active_theme().await, ActiveTheme::Unset);

        let surface = context.controller.surface().lock().await;
        assert_eq!(surface.toasts()[0].message, "Random 3D Theme applied successfully!");
    }

    #[tokio::test]
    async fn serves_commands_over_tcp() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(serve(listener, Arc::new(context())));

        let stream = TcpStream::connect(addr).await.unwrap();
        let (reader, mut writer) = stream.into_split();
        let mut lines = BufReader::new(reader).lines();

        writer.write_all(b"rotate\nswatches\nbogus\n").await.unwrap();
        assert_eq!(lines.next_line().await.unwrap().unwrap(), "OK Rotate");
        assert_eq!(
            lines.next_line().await.unwrap().unwrap(),
            "OK primary=#6c63ff secondary=#ff6584 accent=#43e97b background=#ffffff text=#333333"
        );
        assert_eq!(
            lines.next_line().await.unwrap().unwrap(),
            "ERR unknown command: bogus"
        );
    }
}
