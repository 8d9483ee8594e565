//! Category Taxonomy
//!
//! トップレベルのカテゴリ（閉じた列挙型）と、カテゴリごとに許可された
//! サブカテゴリの静的な許可リスト。Lexiconの検証と分類結果の範囲を決める。

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// ライフドメインのトップレベルカテゴリ
///
/// 宣言順は同点時のタイブレーク順でもある。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Health,
    Productivity,
    Household,
    Practical,
    PersonalDevelopment,
    Entertainment,
    Social,
    Finance,
    Shopping,
    Other,
}

impl Category {
    /// カテゴリ数
    pub const COUNT: usize = 10;

    /// 全カテゴリ（宣言順）
    pub const ALL: [Category; Self::COUNT] = [
        Category::Health,
        Category::Productivity,
        Category::Household,
        Category::Practical,
        Category::PersonalDevelopment,
        Category::Entertainment,
        Category::Social,
        Category::Finance,
        Category::Shopping,
        Category::Other,
    ];

    /// 設定ファイル等で使う識別子
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::Productivity => "productivity",
            Self::Household => "household",
            Self::Practical => "practical",
            Self::PersonalDevelopment => "personal_development",
            Self::Entertainment => "entertainment",
            Self::Social => "social",
            Self::Finance => "finance",
            Self::Shopping => "shopping",
            Self::Other => "other",
        }
    }

    /// 表示用ラベル
    pub fn label(self) -> &'static str {
        match self {
            Self::Health => "Health",
            Self::Productivity => "Productivity",
            Self::Household => "Household",
            Self::Practical => "Practical",
            Self::PersonalDevelopment => "Personal development",
            Self::Entertainment => "Entertainment",
            Self::Social => "Social",
            Self::Finance => "Finance",
            Self::Shopping => "Shopping",
            Self::Other => "Other",
        }
    }

    /// 許可されたサブカテゴリ名（この順序がサブカテゴリのタイブレーク順）
    pub fn subcategory_names(self) -> &'static [&'static str] {
        match self {
            Self::Health => &["sport", "nutrition", "sleep", "mental", "medical"],
            Self::Productivity => &["work", "professional_learning", "planning", "study"],
            Self::Household => &["cleaning", "cooking", "maintenance", "laundry", "garden"],
            Self::Practical => &["administration", "errands", "repairs", "transport"],
            Self::PersonalDevelopment => {
                &["learning", "hobbies", "mindfulness", "reading", "creativity"]
            }
            Self::Entertainment => &["games", "media", "music", "outings"],
            Self::Social => &["friends", "family", "romantic", "community"],
            Self::Finance => &["budgeting", "saving", "investing", "bills"],
            Self::Shopping => &["necessities", "lifestyle"],
            Self::Other => &[],
        }
    }

    /// 許可リストに対して名前を解決する
    pub fn subcategory(self, name: &str) -> Option<Subcategory> {
        self.subcategory_names()
            .iter()
            .position(|n| *n == name)
            .map(|index| Subcategory {
                category: self,
                index,
            })
    }

    /// 許可されたサブカテゴリ一覧
    pub fn subcategories(self) -> impl Iterator<Item = Subcategory> {
        (0..self.subcategory_names().len()).map(move |index| Subcategory {
            category: self,
            index,
        })
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown category '{}'", s))
    }
}

/// 特定カテゴリ内のサブカテゴリ
///
/// `Category::subcategory` でしか生成できないため、流通する値は常に
/// 許可リストのメンバーである。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subcategory {
    category: Category,
    index: usize,
}

impl Subcategory {
    pub fn category(self) -> Category {
        self.category
    }

    pub fn name(self) -> &'static str {
        self.category.subcategory_names()[self.index]
    }

    pub(crate) fn index(self) -> usize {
        self.index
    }
}

impl fmt::Display for Subcategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Subcategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}
