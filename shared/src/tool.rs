use thiserror::Error;

use crate::config::Config;
use crate::Color;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ToolError {
    #[error("option group has no options")]
    Empty,
    #[error("option index {index} out of range (len {len})")]
    OutOfRange { index: usize, len: usize },
    #[error("no option matches {0}")]
    UnknownValue(String),
    #[error("invalid brush size: {0:?}")]
    InvalidSize(String),
}

/// A set of sibling options of which exactly one is active.
#[derive(Clone, Debug, PartialEq)]
pub struct OptionGroup<T> {
    options: Vec<T>,
    active: usize,
}

impl<T> OptionGroup<T> {
    pub fn new(options: Vec<T>) -> Result<Self, ToolError> {
        if options.is_empty() {
            return Err(ToolError::Empty);
        }
        Ok(Self { options, active: 0 })
    }

    pub fn select(&mut self, index: usize) -> Result<&T, ToolError> {
        if index >= self.options.len() {
            return Err(ToolError::OutOfRange {
                index,
                len: self.options.len(),
            });
        }
        self.active = index;
        Ok(&self.options[index])
    }

    pub fn active(&self) -> &T {
        &self.options[self.active]
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.active == index
    }

    pub fn options(&self) -> &[T] {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

impl<T: PartialEq> OptionGroup<T> {
    pub fn position(&self, value: &T) -> Option<usize> {
        self.options.iter().position(|option| option == value)
    }
}

/// Parses a brush size the way the page writes it in `data-size`:
/// surrounding whitespace is ignored and trailing non-digits (`"10px"`) are
/// dropped.
pub fn parse_size(text: &str) -> Result<u32, ToolError> {
    let trimmed = text.trim();
    let digits_end = trimmed
        .char_indices()
        .find(|(index, c)| !(c.is_ascii_digit() || (*index == 0 && *c == '+')))
        .map(|(index, _)| index)
        .unwrap_or(trimmed.len());
    match trimmed[..digits_end].parse::<u32>() {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(ToolError::InvalidSize(text.to_string())),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ToolState {
    colors: OptionGroup<Color>,
    sizes: OptionGroup<u32>,
}

impl ToolState {
    pub fn new(colors: Vec<Color>, sizes: Vec<u32>) -> Result<Self, ToolError> {
        if sizes.iter().any(|size| *size == 0) {
            return Err(ToolError::InvalidSize("0".into()));
        }
        Ok(Self {
            colors: OptionGroup::new(colors)?,
            sizes: OptionGroup::new(sizes)?,
        })
    }

    /// Builds the tool state from a validated config.
    pub fn from_config(config: &Config) -> Result<Self, ToolError> {
        let colors = config
            .palette
            .iter()
            .map(|text| Color::parse(text).map_err(|_| ToolError::UnknownValue(text.clone())))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(colors, config.sizes.clone())
    }

    pub fn current_color(&self) -> Color {
        *self.colors.active()
    }

    pub fn current_size(&self) -> u32 {
        *self.sizes.active()
    }

    pub fn colors(&self) -> &OptionGroup<Color> {
        &self.colors
    }

    pub fn sizes(&self) -> &OptionGroup<u32> {
        &self.sizes
    }

    pub fn select_color(&mut self, index: usize) -> Result<Color, ToolError> {
        self.colors.select(index).copied()
    }

    pub fn select_size(&mut self, index: usize) -> Result<u32, ToolError> {
        self.sizes.select(index).copied()
    }

    pub fn select_color_value(&mut self, text: &str) -> Result<Color, ToolError> {
        let color = Color::parse(text).map_err(|_| ToolError::UnknownValue(text.to_string()))?;
        let index = self
            .colors
            .position(&color)
            .ok_or_else(|| ToolError::UnknownValue(text.to_string()))?;
        self.select_color(index)
    }

    pub fn select_size_value(&mut self, text: &str) -> Result<u32, ToolError> {
        let size = parse_size(text)?;
        let index = self
            .sizes
            .position(&size)
            .ok_or_else(|| ToolError::UnknownValue(text.to_string()))?;
        self.select_size(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tools() -> ToolState {
        ToolState::new(
            vec![Color::BLACK, Color::rgb(255, 0, 0), Color::rgb(0, 0, 255)],
            vec![5, 10, 15],
        )
        .unwrap()
    }

    #[test]
    fn defaults_to_first_options() {
        let tools = tools();
        assert_eq!(tools.current_color(), Color::BLACK);
        assert_eq!(tools.current_size(), 5);
        assert!(tools.colors().is_active(0));
        assert!(tools.sizes().is_active(0));
    }

    #[test]
    fn selection_is_exclusive() {
        let mut tools = tools();
        tools.select_color(2).unwrap();
        tools.select_color(1).unwrap();
        let active: Vec<usize> = (0..tools.colors().len())
            .filter(|index| tools.colors().is_active(*index))
            .collect();
        assert_eq!(active, vec![1]);
        assert_eq!(tools.current_color(), Color::rgb(255, 0, 0));
    }

    #[test]
    fn out_of_range_selection_keeps_state() {
        let mut tools = tools();
        tools.select_size(1).unwrap();
        assert_eq!(
            tools.select_size(7),
            Err(ToolError::OutOfRange { index: 7, len: 3 })
        );
        assert_eq!(tools.current_size(), 10);
    }

    #[test]
    fn selects_by_associated_value() {
        let mut tools = tools();
        assert_eq!(tools.select_color_value("#FF0000"), Ok(Color::rgb(255, 0, 0)));
        assert_eq!(tools.select_size_value("15"), Ok(15));
        assert!(tools.select_color_value("#123456").is_err());
        assert!(tools.select_size_value("40").is_err());
        assert_eq!(tools.current_color(), Color::rgb(255, 0, 0));
        assert_eq!(tools.current_size(), 15);
    }

    #[test]
    fn parse_size_accepts_integer_prefix() {
        assert_eq!(parse_size("10"), Ok(10));
        assert_eq!(parse_size(" 20 "), Ok(20));
        assert_eq!(parse_size("15px"), Ok(15));
        assert!(parse_size("0").is_err());
        assert!(parse_size("abc").is_err());
        assert!(parse_size("").is_err());
        assert!(parse_size("-4").is_err());
    }

    #[test]
    fn empty_groups_are_rejected() {
        assert_eq!(ToolState::new(vec![], vec![5]), Err(ToolError::Empty));
        assert_eq!(ToolState::new(vec![Color::BLACK], vec![]), Err(ToolError::Empty));
    }
}
