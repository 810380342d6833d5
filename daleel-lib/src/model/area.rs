//! Content areas and their hierarchy shapes

use super::NodeKind;

/// The four hierarchical content browsers of the platform.
///
/// All four share the same structural shape; they differ in naming and in
/// nesting depth. Protocols and PowerPoints are *shallow* (category → item),
/// The Essentials and The Handbook are *deep* (section → chapter → lesson).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentArea {
    Protocols,
    Powerpoints,
    Essentials,
    Handbook,
}

impl ContentArea {
    /// All content areas, in display order.
    pub const ALL: [ContentArea; 4] = [
        ContentArea::Protocols,
        ContentArea::Powerpoints,
        ContentArea::Essentials,
        ContentArea::Handbook,
    ];

    /// The URL path segment for this area.
    pub fn as_path(&self) -> &'static str {
        match self {
            ContentArea::Protocols => "protocols",
            ContentArea::Powerpoints => "powerpoints",
            ContentArea::Essentials => "essentials",
            ContentArea::Handbook => "handbook",
        }
    }

    /// Number of levels in this area's navigation tree.
    ///
    /// Shallow areas have two (category → item), deep areas three
    /// (section → chapter → lesson).
    pub fn depth(&self) -> usize {
        match self {
            ContentArea::Protocols | ContentArea::Powerpoints => 2,
            ContentArea::Essentials | ContentArea::Handbook => 3,
        }
    }

    /// Returns `true` if this area uses the shallow category → item shape.
    pub fn is_shallow(&self) -> bool {
        self.depth() == 2
    }

    /// The node kind at a given level of this area's tree (0 = top level).
    ///
    /// Returns `None` past the deepest level.
    pub fn kind_at_level(&self, level: usize) -> Option<NodeKind> {
        if self.is_shallow() {
            match level {
                0 => Some(NodeKind::Category),
                1 => Some(NodeKind::Lesson),
                _ => None,
            }
        } else {
            match level {
                0 => Some(NodeKind::Section),
                1 => Some(NodeKind::Chapter),
                2 => Some(NodeKind::Lesson),
                _ => None,
            }
        }
    }
}

impl std::fmt::Display for ContentArea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_path())
    }
}

impl std::str::FromStr for ContentArea {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "protocols" => Ok(ContentArea::Protocols),
            "powerpoints" => Ok(ContentArea::Powerpoints),
            "essentials" => Ok(ContentArea::Essentials),
            "handbook" => Ok(ContentArea::Handbook),
            other => Err(format!("unknown content area '{other}'")),
        }
    }
}

/// Reading mode for The Handbook: one lesson at a time, or a whole chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandbookMode {
    Lesson,
    Chapter,
}

impl HandbookMode {
    /// The query-string value for this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            HandbookMode::Lesson => "lesson",
            HandbookMode::Chapter => "chapter",
        }
    }

    /// Parses a query-string value.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "lesson" => Some(HandbookMode::Lesson),
            "chapter" => Some(HandbookMode::Chapter),
            _ => None,
        }
    }
}

impl std::fmt::Display for HandbookMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_levels() {
        assert_eq!(
            ContentArea::Handbook.kind_at_level(0),
            Some(NodeKind::Section)
        );
        assert_eq!(
            ContentArea::Handbook.kind_at_level(2),
            Some(NodeKind::Lesson)
        );
        assert_eq!(ContentArea::Handbook.kind_at_level(3), None);

        assert_eq!(
            ContentArea::Protocols.kind_at_level(0),
            Some(NodeKind::Category)
        );
        assert_eq!(
            ContentArea::Protocols.kind_at_level(1),
            Some(NodeKind::Lesson)
        );
        assert_eq!(ContentArea::Protocols.kind_at_level(2), None);
    }

    #[test]
    fn test_area_parse() {
        for area in ContentArea::ALL {
            assert_eq!(area.as_path().parse::<ContentArea>(), Ok(area));
        }
        assert!("marketing".parse::<ContentArea>().is_err());
    }
}
