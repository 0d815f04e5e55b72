use ratatui::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeKind {
    Dark,
    Light,
}

impl ThemeKind {
    pub fn from_config_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "light" => ThemeKind::Light,
            _ => ThemeKind::Dark,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub kind: ThemeKind,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub header_accent_fg: Color,
    pub header_accent_bg: Color,
    pub table_header_fg: Color,
    pub table_header_bg: Color,
    pub sort_column_fg: Color,
    pub selection_fg: Color,
    pub selection_bg: Color,
    pub cpu_hot: Color,
    pub gauge_filled: Color,
    pub gauge_unfilled: Color,
    pub statusbar_bg: Color,
    pub status_ok: Color,
    pub status_err: Color,
    pub pill_key_fg: Color,
    pub pill_key_bg: Color,
    pub pill_desc_fg: Color,
    pub surface_bg: Color,
    pub overlay_border: Color,
    pub accent: Color,
}

impl Theme {
    pub fn from_config(name: &str) -> Self {
        match ThemeKind::from_config_str(name) {
            ThemeKind::Dark => Self::dark(),
            ThemeKind::Light => Self::light(),
        }
    }

    pub fn dark() -> Self {
        Theme {
            kind: ThemeKind::Dark,
            text_primary: Color::Rgb(0xcd, 0xd6, 0xf4),
            text_secondary: Color::Rgb(0x93, 0x99, 0xb2),
            header_accent_fg: Color::Rgb(0x1e, 0x1e, 0x2e),
            header_accent_bg: Color::Rgb(0x89, 0xb4, 0xfa),
            table_header_fg: Color::Rgb(0x1e, 0x1e, 0x2e),
            table_header_bg: Color::Rgb(0xa6, 0xe3, 0xa1),
            sort_column_fg: Color::Rgb(0x11, 0x11, 0x1b),
            selection_fg: Color::Rgb(0x1e, 0x1e, 0x2e),
            selection_bg: Color::Rgb(0xf9, 0xe2, 0xaf),
            cpu_hot: Color::Rgb(0xf3, 0x8b, 0xa8),
            gauge_filled: Color::Rgb(0x89, 0xb4, 0xfa),
            gauge_unfilled: Color::Rgb(0x31, 0x32, 0x44),
            statusbar_bg: Color::Rgb(0x18, 0x18, 0x25),
            status_ok: Color::Rgb(0xa6, 0xe3, 0xa1),
            status_err: Color::Rgb(0xf3, 0x8b, 0xa8),
            pill_key_fg: Color::Rgb(0x1e, 0x1e, 0x2e),
            pill_key_bg: Color::Rgb(0xcb, 0xa6, 0xf7),
            pill_desc_fg: Color::Rgb(0xcd, 0xd6, 0xf4),
            surface_bg: Color::Rgb(0x1e, 0x1e, 0x2e),
            overlay_border: Color::Rgb(0x58, 0x5b, 0x70),
            accent: Color::Rgb(0xcb, 0xa6, 0xf7),
        }
    }

    pub fn light() -> Self {
        Theme {
            kind: ThemeKind::Light,
            text_primary: Color::Rgb(0x4c, 0x4f, 0x69),
            text_secondary: Color::Rgb(0x6c, 0x6f, 0x85),
            header_accent_fg: Color::Rgb(0xef, 0xf1, 0xf5),
            header_accent_bg: Color::Rgb(0x1e, 0x66, 0xf5),
            table_header_fg: Color::Rgb(0xef, 0xf1, 0xf5),
            table_header_bg: Color::Rgb(0x40, 0xa0, 0x2b),
            sort_column_fg: Color::Rgb(0xef, 0xf1, 0xf5),
            selection_fg: Color::Rgb(0x4c, 0x4f, 0x69),
            selection_bg: Color::Rgb(0xdf, 0x8e, 0x1d),
            cpu_hot: Color::Rgb(0xd2, 0x0f, 0x39),
            gauge_filled: Color::Rgb(0x1e, 0x66, 0xf5),
            gauge_unfilled: Color::Rgb(0xcc, 0xd0, 0xda),
            statusbar_bg: Color::Rgb(0xe6, 0xe9, 0xef),
            status_ok: Color::Rgb(0x40, 0xa0, 0x2b),
            status_err: Color::Rgb(0xd2, 0x0f, 0x39),
            pill_key_fg: Color::Rgb(0xef, 0xf1, 0xf5),
            pill_key_bg: Color::Rgb(0x88, 0x39, 0xef),
            pill_desc_fg: Color::Rgb(0x4c, 0x4f, 0x69),
            surface_bg: Color::Rgb(0xef, 0xf1, 0xf5),
            overlay_border: Color::Rgb(0x9c, 0xa0, 0xb0),
            accent: Color::Rgb(0x88, 0x39, 0xef),
        }
    }
}
