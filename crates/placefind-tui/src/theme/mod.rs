use ratatui::style::Color;

/// Nord palette with the semantic roles the widget uses.
pub struct Theme {
    // Polar Night
    pub nord0: Color, // #2E3440 background
    pub nord1: Color, // #3B4252 active row
    pub nord2: Color, // #434C5E borders
    pub nord3: Color, // #4C566A placeholder, hints

    // Snow Storm
    pub nord4: Color, // #D8DEE9 text
    pub nord6: Color, // #ECEFF4 highlighted text

    // Frost
    pub nord8: Color,  // #88C0D0 focus
    pub nord10: Color, // #5E81AC active marker

    // Aurora
    pub nord11: Color, // #BF616A errors
    pub nord13: Color, // #EBCB8B spinner
    pub nord14: Color, // #A3BE8C committed selection
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            nord0: Color::Rgb(46, 52, 64),
            nord1: Color::Rgb(59, 66, 82),
            nord2: Color::Rgb(67, 76, 94),
            nord3: Color::Rgb(76, 86, 106),
            nord4: Color::Rgb(216, 222, 233),
            nord6: Color::Rgb(236, 239, 244),
            nord8: Color::Rgb(136, 192, 208),
            nord10: Color::Rgb(94, 129, 172),
            nord11: Color::Rgb(191, 97, 106),
            nord13: Color::Rgb(235, 203, 139),
            nord14: Color::Rgb(163, 190, 140),
        }
    }
}

impl Theme {
    pub fn bg(&self) -> Color {
        self.nord0
    }
    pub fn active_row(&self) -> Color {
        self.nord1
    }
    pub fn border(&self) -> Color {
        self.nord2
    }
    pub fn muted(&self) -> Color {
        self.nord3
    }
    pub fn fg(&self) -> Color {
        self.nord4
    }
    pub fn fg_bright(&self) -> Color {
        self.nord6
    }
    pub fn focus(&self) -> Color {
        self.nord8
    }
    pub fn marker(&self) -> Color {
        self.nord10
    }
    pub fn danger(&self) -> Color {
        self.nord11
    }
    pub fn spinner(&self) -> Color {
        self.nord13
    }
    pub fn success(&self) -> Color {
        self.nord14
    }
}
