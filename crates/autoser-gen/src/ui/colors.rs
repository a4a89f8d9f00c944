use std::io::IsTerminal;

use clap::{
  ValueEnum,
  builder::styling::{AnsiColor, Color as ClapColor, RgbColor, Style, Styles},
};
use comfy_table::Color as ComfyColor;
use crossterm::style::Color;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
  Always,
  Auto,
  Never,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ThemeMode {
  Dark,
  Light,
  Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
  Dark,
  Light,
}

struct Palette {
  timestamp: Color,
  primary: Color,
  accent: Color,
  label: Color,
  value: Color,
  success: Color,
  warning: Color,
  error: Color,
}

const DARK: Palette = Palette {
  timestamp: Color::Rgb { r: 128, g: 150, b: 170 },
  primary: Color::Rgb { r: 200, g: 200, b: 210 },
  accent: Color::Rgb { r: 120, g: 170, b: 220 },
  label: Color::Rgb { r: 150, g: 190, b: 230 },
  value: Color::Rgb { r: 235, g: 235, b: 240 },
  success: Color::Rgb { r: 120, g: 200, b: 140 },
  warning: Color::Rgb { r: 230, g: 190, b: 90 },
  error: Color::Rgb { r: 230, g: 100, b: 100 },
};

const LIGHT: Palette = Palette {
  timestamp: Color::Rgb { r: 90, g: 100, b: 115 },
  primary: Color::Rgb { r: 40, g: 40, b: 50 },
  accent: Color::Rgb { r: 30, g: 90, b: 160 },
  label: Color::Rgb { r: 20, g: 80, b: 140 },
  value: Color::Rgb { r: 15, g: 15, b: 20 },
  success: Color::Rgb { r: 30, g: 130, b: 70 },
  warning: Color::Rgb { r: 160, g: 110, b: 0 },
  error: Color::Rgb { r: 180, g: 40, b: 40 },
};

pub struct Colors {
  enabled: bool,
  theme: Theme,
}

pub trait IntoComfyColor {
  fn into(self) -> ComfyColor;
}

impl IntoComfyColor for Color {
  fn into(self) -> ComfyColor {
    match self {
      Color::Rgb { r, g, b } => ComfyColor::Rgb { r, g, b },
      Color::AnsiValue(value) => ComfyColor::AnsiValue(value),
      Color::Black => ComfyColor::Black,
      Color::DarkGrey => ComfyColor::DarkGrey,
      Color::Red => ComfyColor::Red,
      Color::DarkRed => ComfyColor::DarkRed,
      Color::Green => ComfyColor::Green,
      Color::DarkGreen => ComfyColor::DarkGreen,
      Color::Yellow => ComfyColor::Yellow,
      Color::DarkYellow => ComfyColor::DarkYellow,
      Color::Blue => ComfyColor::Blue,
      Color::DarkBlue => ComfyColor::DarkBlue,
      Color::Magenta => ComfyColor::Magenta,
      Color::DarkMagenta => ComfyColor::DarkMagenta,
      Color::Cyan => ComfyColor::Cyan,
      Color::DarkCyan => ComfyColor::DarkCyan,
      Color::White => ComfyColor::White,
      Color::Grey => ComfyColor::Grey,
      Color::Reset => ComfyColor::Reset,
    }
  }
}

impl Colors {
  pub const fn new(enabled: bool, theme: Theme) -> Self {
    Self { enabled, theme }
  }

  const fn palette(&self) -> &'static Palette {
    match self.theme {
      Theme::Dark => &DARK,
      Theme::Light => &LIGHT,
    }
  }

  const fn pick(&self, color: Color) -> Color {
    if self.enabled { color } else { Color::Reset }
  }

  pub const fn timestamp(&self) -> Color {
    self.pick(self.palette().timestamp)
  }

  pub const fn primary(&self) -> Color {
    self.pick(self.palette().primary)
  }

  pub const fn accent(&self) -> Color {
    self.pick(self.palette().accent)
  }

  pub const fn label(&self) -> Color {
    self.pick(self.palette().label)
  }

  pub const fn value(&self) -> Color {
    self.pick(self.palette().value)
  }

  pub const fn success(&self) -> Color {
    self.pick(self.palette().success)
  }

  pub const fn warning(&self) -> Color {
    self.pick(self.palette().warning)
  }

  pub const fn error(&self) -> Color {
    self.pick(self.palette().error)
  }

  const fn to_clap(color: Color) -> Option<ClapColor> {
    match color {
      Color::Rgb { r, g, b } => Some(ClapColor::Rgb(RgbColor(r, g, b))),
      Color::Red | Color::DarkRed => Some(ClapColor::Ansi(AnsiColor::Red)),
      Color::Green | Color::DarkGreen => Some(ClapColor::Ansi(AnsiColor::Green)),
      Color::Yellow | Color::DarkYellow => Some(ClapColor::Ansi(AnsiColor::Yellow)),
      Color::Blue | Color::DarkBlue => Some(ClapColor::Ansi(AnsiColor::Blue)),
      Color::Cyan | Color::DarkCyan => Some(ClapColor::Ansi(AnsiColor::Cyan)),
      _ => None,
    }
  }

  pub const fn clap_styles() -> Styles {
    let colors = Self::new(true, Theme::Dark);

    Styles::styled()
      .header(Style::new().bold().underline().fg_color(Self::to_clap(colors.label())))
      .usage(Style::new().bold().fg_color(Self::to_clap(colors.label())))
      .literal(Style::new().fg_color(Self::to_clap(colors.accent())))
      .placeholder(Style::new().fg_color(Self::to_clap(colors.timestamp())))
      .error(Style::new().bold().fg_color(Self::to_clap(colors.error())))
      .valid(Style::new().fg_color(Self::to_clap(colors.success())))
      .invalid(Style::new().bold().fg_color(Self::to_clap(colors.warning())))
  }
}

/// `auto` honors `NO_COLOR`.
pub fn colors_enabled(mode: ColorMode) -> bool {
  match mode {
    ColorMode::Always => true,
    ColorMode::Never => false,
    ColorMode::Auto => std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal(),
  }
}

pub fn detect_theme(mode: ThemeMode) -> Theme {
  match mode {
    ThemeMode::Dark => Theme::Dark,
    ThemeMode::Light => Theme::Light,
    ThemeMode::Auto => theme_from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref()).unwrap_or(Theme::Dark),
  }
}

/// `COLORFGBG` is `fg;bg` (sometimes `fg;default;bg`); backgrounds 7 and
/// 9..=15 are light.
fn theme_from_colorfgbg(value: Option<&str>) -> Option<Theme> {
  let background = value?.split(';').next_back()?.parse::<u8>().ok()?;
  Some(if background == 7 || background >= 9 {
    Theme::Light
  } else {
    Theme::Dark
  })
}
