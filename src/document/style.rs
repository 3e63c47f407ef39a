// 🎨 Style primitives shared by both document kinds

/// Points per inch
pub const INCH: f32 = 72.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Color { r, g, b }
    }

    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    /// Accent for titles and the table header
    pub const ACCENT: Color = Color::rgb(1.0, 0.0, 0.0);
    /// Shade for even-indexed data rows (whitesmoke)
    pub const SHADE_EVEN: Color = Color::rgb(0.96, 0.96, 0.96);
    /// Shade for odd-indexed data rows (light grey)
    pub const SHADE_ODD: Color = Color::rgb(0.827, 0.827, 0.827);
}

/// Banding by zero-based data-row index; the header is not counted
pub fn row_shade(data_row_index: usize) -> Color {
    if data_row_index % 2 == 0 {
        Color::SHADE_EVEN
    } else {
        Color::SHADE_ODD
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFace {
    Regular,
    Bold,
}

impl FontFace {
    /// Standard Type1 font name
    pub fn base_font(&self) -> &'static str {
        match self {
            FontFace::Regular => "Helvetica",
            FontFace::Bold => "Helvetica-Bold",
        }
    }

    /// Resource name used inside page content streams
    pub fn resource_name(&self) -> &'static str {
        match self {
            FontFace::Regular => "F1",
            FontFace::Bold => "F2",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub face: FontFace,
    pub size: f32,
    pub leading: f32,
    pub color: Color,
    pub align: Align,
    pub space_after: f32,
}

impl TextStyle {
    pub fn title() -> Self {
        TextStyle {
            face: FontFace::Bold,
            size: 24.0,
            leading: 28.8,
            color: Color::ACCENT,
            align: Align::Center,
            space_after: 12.0,
        }
    }

    pub fn subtitle() -> Self {
        TextStyle {
            face: FontFace::Regular,
            size: 14.0,
            leading: 16.8,
            color: Color::BLACK,
            align: Align::Center,
            space_after: 24.0,
        }
    }

    pub fn body() -> Self {
        TextStyle {
            face: FontFace::Regular,
            size: 12.0,
            leading: 15.0,
            color: Color::BLACK,
            align: Align::Left,
            space_after: 12.0,
        }
    }
}

/// Cell styling for the attendance table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableStyle {
    pub font_size: f32,
    pub leading: f32,
    pub padding_x: f32,
    pub padding_top: f32,
    pub padding_bottom: f32,
    pub header_padding_bottom: f32,
    pub grid_width: f32,
    pub grid_color: Color,
    pub header_background: Color,
    pub header_foreground: Color,
    pub body_foreground: Color,
}

impl Default for TableStyle {
    fn default() -> Self {
        TableStyle {
            font_size: 10.0,
            leading: 12.0,
            padding_x: 6.0,
            padding_top: 3.0,
            padding_bottom: 3.0,
            header_padding_bottom: 12.0,
            grid_width: 1.0,
            grid_color: Color::BLACK,
            header_background: Color::ACCENT,
            header_foreground: Color::WHITE,
            body_foreground: Color::BLACK,
        }
    }
}

/// Attendance table column widths (name : position : mode : status = 2 : 2 : 1.5 : 1.5 in)
pub const ATTENDANCE_COLUMN_WIDTHS: [f32; 4] = [2.0 * INCH, 2.0 * INCH, 1.5 * INCH, 1.5 * INCH];

/// Print page with fixed margins, in points (origin bottom-left)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl PageGeometry {
    /// US Letter with 1-inch margins
    pub fn letter() -> Self {
        PageGeometry {
            width: 8.5 * INCH,
            height: 11.0 * INCH,
            margin: INCH,
        }
    }

    pub fn frame_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    pub fn frame_top(&self) -> f32 {
        self.height - self.margin
    }

    pub fn frame_bottom(&self) -> f32 {
        self.margin
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::letter()
    }
}
