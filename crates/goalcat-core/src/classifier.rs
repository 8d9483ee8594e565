//! Classifier
//!
//! 正規化 → フレーズ照合 → 単語照合 → 文脈ルール → 時間帯ルール → 勝者選択
//! のパイプライン。呼び出しごとにスコアボードを生成して破棄するため、
//! 共有可変状態はなく、複数スレッドから同時に呼び出せる。

use std::fmt;

use once_cell::sync::OnceCell;
use serde::Serialize;

use crate::config::Config;
use crate::context::{RuleBook, RuleInput};
use crate::error::Result;
use crate::lexicon::Lexicon;
use crate::matcher::{self, KeywordMatch, Matches};
use crate::normalize::normalize;
use crate::params::ScoringParams;
use crate::score::{CategoryScore, ScoreBoard};
use crate::select;
use crate::taxonomy::{Category, Subcategory};

/// 分類結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DetectionResult {
    pub category: Category,
    pub subcategory: Option<Subcategory>,
}

impl fmt::Display for DetectionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.subcategory {
            Some(sub) => write!(f, "{}/{}", self.category, sub),
            None => write!(f, "{}", self.category),
        }
    }
}

/// 分類の監査トレース
#[derive(Debug, Clone, Serialize)]
pub struct Explanation {
    pub result: Option<DetectionResult>,
    /// 時間帯ルールで即決した場合 true（スコアは参考値）
    pub decided_by_time_slot: bool,
    pub matches: Vec<KeywordMatch>,
    pub fired_rules: Vec<String>,
    pub time_bonus: bool,
    pub penalties: Vec<&'static str>,
    pub scores: Vec<CategoryScore>,
}

/// キーワード分類器
///
/// 構築後は読み取り専用。
#[derive(Debug, Clone)]
pub struct Classifier {
    lexicon: Lexicon,
    rules: RuleBook,
    params: ScoringParams,
}

impl Classifier {
    pub fn new(lexicon: Lexicon, rules: RuleBook, params: ScoringParams) -> Self {
        Self {
            lexicon,
            rules,
            params,
        }
    }

    /// ビルトインの辞書・ルール・既定パラメータで構築（プロセスで一度だけ）
    pub fn builtin() -> Result<&'static Classifier> {
        static BUILTIN: OnceCell<Classifier> = OnceCell::new();
        BUILTIN.get_or_try_init(|| {
            Ok(Self::new(
                Lexicon::builtin()?,
                RuleBook::builtin()?,
                ScoringParams::default(),
            ))
        })
    }

    /// 設定に従って構築（パス未指定の辞書・ルールはビルトインを使用）
    pub fn from_config(config: &Config) -> Result<Self> {
        let lexicon = match &config.lexicon.path {
            Some(path) => Lexicon::load(path)?,
            None => Lexicon::builtin()?,
        };
        let rules = match &config.rules.path {
            Some(path) => RuleBook::load(path)?,
            None => RuleBook::builtin()?,
        };
        Ok(Self::new(lexicon, rules, config.scoring.clone()))
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn rules(&self) -> &RuleBook {
        &self.rules
    }

    pub fn params(&self) -> &ScoringParams {
        &self.params
    }

    /// タイトル・説明・時間帯からカテゴリを推定する
    ///
    /// 確信度が下限に届かない場合は `None`。入力が何であってもパニックしない。
    pub fn classify(
        &self,
        title: &str,
        description: Option<&str>,
        time_slot: Option<&str>,
    ) -> Option<DetectionResult> {
        self.explain(title, description, time_slot).result
    }

    /// `classify` と同じ処理を行い、途中経過も返す
    pub fn explain(
        &self,
        title: &str,
        description: Option<&str>,
        time_slot: Option<&str>,
    ) -> Explanation {
        let text = normalize(title, description, time_slot);
        let mut board = ScoreBoard::new();
        let mut matches = Matches::default();

        matcher::match_phrases(&self.lexicon, &text, &self.params, &mut board, &mut matches);
        matcher::match_words(&self.lexicon, &text, &mut board, &mut matches);

        let fired_rules = if matches.is_empty() {
            Vec::new()
        } else {
            self.rules.context.apply(
                RuleInput {
                    text: &text,
                    matches: &matches,
                },
                &mut board,
                &self.params,
            )
        };

        let mut time_bonus = false;
        if let Some(slot) = time_slot {
            if let Some(sleep) = self.rules.time_slot.short_circuit(slot, &text) {
                return Explanation {
                    result: Some(DetectionResult {
                        category: sleep.category(),
                        subcategory: Some(sleep),
                    }),
                    decided_by_time_slot: true,
                    matches: matches.into_records(),
                    fired_rules,
                    time_bonus,
                    penalties: Vec::new(),
                    scores: board.snapshot(),
                };
            }
            time_bonus = self
                .rules
                .time_slot
                .apply_bonus(slot, &text, &mut board, &self.params);
        }

        let penalties = select::apply_penalties(&mut board, &self.params);
        let result = select::pick_winner(&board, &self.params);

        Explanation {
            result,
            decided_by_time_slot: false,
            matches: matches.into_records(),
            fired_rules,
            time_bonus,
            penalties,
            scores: board.snapshot(),
        }
    }
}
