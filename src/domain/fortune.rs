use crate::domain::catalog::{CategoryMember, FortuneType};
use crate::domain::error::FortuneError;
use crate::domain::seed::{format_date, pick_index, seed_for, seeded_random, Seed};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Overall,
    Love,
    Money,
    Health,
    Career,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Overall,
        Category::Love,
        Category::Money,
        Category::Health,
        Category::Career,
    ];

    fn score_offset(&self) -> u32 {
        match self {
            Category::Overall => 0,
            Category::Love => 1,
            Category::Money => 2,
            Category::Health => 3,
            Category::Career => 4,
        }
    }

    fn message_offset(&self) -> u32 {
        self.score_offset() + 10
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityTier {
    Excellent,
    Good,
    Normal,
    Poor,
}

impl SeverityTier {
    pub fn for_score(score: u32) -> Self {
        if score >= 80 {
            SeverityTier::Excellent
        } else if score >= 60 {
            SeverityTier::Good
        } else if score >= 40 {
            SeverityTier::Normal
        } else {
            SeverityTier::Poor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityTier::Excellent => "excellent",
            SeverityTier::Good => "good",
            SeverityTier::Normal => "normal",
            SeverityTier::Poor => "poor",
        }
    }
}

impl fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreSet {
    pub overall: u32,
    pub love: u32,
    pub money: u32,
    pub health: u32,
    pub career: u32,
}

impl ScoreSet {
    pub fn generate(seed: Seed) -> Self {
        let draw = |category: Category| score_from_draw(seeded_random(seed, category.score_offset()));
        ScoreSet {
            overall: draw(Category::Overall),
            love: draw(Category::Love),
            money: draw(Category::Money),
            health: draw(Category::Health),
            career: draw(Category::Career),
        }
    }

    pub fn get(&self, category: Category) -> u32 {
        match category {
            Category::Overall => self.overall,
            Category::Love => self.love,
            Category::Money => self.money,
            Category::Health => self.health,
            Category::Career => self.career,
        }
    }
}

fn score_from_draw(draw: f64) -> u32 {
    (draw * 60.0).floor() as u32 + 40
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Messages {
    pub overall: &'static str,
    pub love: &'static str,
    pub money: &'static str,
    pub health: &'static str,
    pub career: &'static str,
}

impl Messages {
    pub fn select(seed: Seed, scores: &ScoreSet) -> Self {
        let pick = |category: Category| {
            select_message(category, scores.get(category), seeded_random(seed, category.message_offset()))
        };
        Messages {
            overall: pick(Category::Overall),
            love: pick(Category::Love),
            money: pick(Category::Money),
            health: pick(Category::Health),
            career: pick(Category::Career),
        }
    }
}

pub fn select_message(category: Category, score: u32, draw: f64) -> &'static str {
    let pool = message_pool(category, SeverityTier::for_score(score));
    pool[pick_index(draw, pool.len())]
}

pub fn message_pool(category: Category, tier: SeverityTier) -> &'static [&'static str] {
    use Category::*;
    use SeverityTier::*;
    match (category, tier) {
        (Overall, Excellent) => &[
            "오늘은 모든 일이 순조롭게 풀리는 날입니다. 자신감을 가지고 도전하세요!",
            "행운이 가득한 하루가 될 것입니다. 새로운 기회를 놓치지 마세요.",
            "긍정적인 에너지가 넘치는 날입니다. 주변 사람들에게도 좋은 영향을 줄 수 있어요.",
        ],
        (Overall, Good) => &[
            "전반적으로 좋은 하루가 예상됩니다. 꾸준한 노력이 결실을 맺을 거예요.",
            "작은 행운들이 모여 큰 기쁨이 될 수 있는 날입니다.",
            "안정적인 하루가 될 것입니다. 계획한 일들을 차근차근 진행하세요.",
        ],
        (Overall, Normal) => &[
            "평범하지만 안정적인 하루입니다. 무리하지 말고 여유를 가지세요.",
            "특별한 일은 없지만 평화로운 하루가 될 것입니다.",
            "조용히 자신을 돌아보기 좋은 날입니다.",
        ],
        (Overall, Poor) => &[
            "조금 어려운 하루가 될 수 있습니다. 인내심을 가지세요.",
            "예상치 못한 일이 생길 수 있으니 주의가 필요합니다.",
            "무리한 결정은 피하고 신중하게 행동하세요.",
        ],
        (Love, Excellent) => &["로맨틱한 만남이 기대되는 날입니다. 💕", "연인과의 관계가 더욱 깊어질 수 있어요."],
        (Love, Good) => &["따뜻한 대화가 오가는 하루가 될 것입니다.", "소중한 사람과 함께하는 시간을 가져보세요."],
        (Love, Normal) => &["평온한 관계가 유지됩니다.", "서로에 대한 이해가 필요한 시기입니다."],
        (Love, Poor) => &["오해가 생길 수 있으니 대화에 신중하세요.", "감정적인 결정은 피하는 것이 좋습니다."],
        (Money, Excellent) => &["재물운이 상승하는 날입니다! 💰", "예상치 못한 수입이 생길 수 있어요."],
        (Money, Good) => &["안정적인 재정 상태가 유지됩니다.", "계획적인 소비로 저축이 가능한 날입니다."],
        (Money, Normal) => &["큰 지출은 피하는 것이 좋습니다.", "현재 상태를 유지하는 것이 현명합니다."],
        (Money, Poor) => &["충동구매를 주의하세요.", "금전적인 결정은 신중하게 내리세요."],
        (Health, Excellent) => &["활력이 넘치는 하루입니다! 💪", "운동을 시작하기 좋은 날이에요."],
        (Health, Good) => &["전반적으로 건강한 상태입니다.", "규칙적인 생활이 도움이 됩니다."],
        (Health, Normal) => &["무리하지 않는 것이 좋습니다.", "충분한 휴식이 필요합니다."],
        (Health, Poor) => &["피로가 쌓일 수 있으니 주의하세요.", "건강 관리에 신경 쓰세요."],
        (Career, Excellent) => &["승진이나 좋은 기회가 올 수 있습니다! 🎯", "업무에서 인정받는 하루가 될 것입니다."],
        (Career, Good) => &["꾸준한 노력이 성과로 이어집니다.", "동료들과의 협업이 잘 되는 날입니다."],
        (Career, Normal) => &["평소처럼 업무를 진행하세요.", "새로운 도전보다는 안정을 추구하세요."],
        (Career, Poor) => &["업무 실수에 주의하세요.", "중요한 결정은 미루는 것이 좋습니다."],
    }
}

pub const LUCKY_COLORS: [&str; 10] = [
    "빨간색", "파란색", "노란색", "초록색", "보라색", "주황색", "분홍색", "하늘색", "금색", "은색",
];

pub const LUCKY_DIRECTIONS: [&str; 8] = [
    "동쪽", "서쪽", "남쪽", "북쪽", "동남쪽", "동북쪽", "서남쪽", "서북쪽",
];

const COLOR_OFFSET: u32 = 20;
const NUMBER_OFFSET: u32 = 21;
const DIRECTION_OFFSET: u32 = 22;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LuckyAttributes {
    pub color: &'static str,
    pub number: u8,
    pub direction: &'static str,
}

impl LuckyAttributes {
    pub fn generate(seed: Seed) -> Self {
        LuckyAttributes {
            color: LUCKY_COLORS[pick_index(seeded_random(seed, COLOR_OFFSET), LUCKY_COLORS.len())],
            number: ball_from_draw(seeded_random(seed, NUMBER_OFFSET)),
            direction: LUCKY_DIRECTIONS[pick_index(seeded_random(seed, DIRECTION_OFFSET), LUCKY_DIRECTIONS.len())],
        }
    }
}

/// Lottery ball in [1, 45].
pub fn ball_from_draw(draw: f64) -> u8 {
    (pick_index(draw, 45) + 1) as u8
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FortuneRecord {
    pub date: String,
    #[serde(rename = "type")]
    pub kind: FortuneType,
    pub id: &'static str,
    pub name: &'static str,
    pub glyph: &'static str,
    pub scores: ScoreSet,
    pub messages: Messages,
    pub lucky: LuckyAttributes,
}

impl FortuneRecord {
    pub fn tier(&self, category: Category) -> SeverityTier {
        SeverityTier::for_score(self.scores.get(category))
    }
}

/// Builds the full fortune for one member of `kind` on `date`.
pub fn get_fortune(kind: FortuneType, id: &str, date: NaiveDate) -> Result<FortuneRecord, FortuneError> {
    let member = kind.find(id).ok_or_else(|| FortuneError::UnknownMember {
        kind,
        id: id.to_string(),
    })?;
    Ok(assemble(kind, member, date))
}

pub(crate) fn assemble(kind: FortuneType, member: &'static CategoryMember, date: NaiveDate) -> FortuneRecord {
    let seed = seed_for(date, member.id);
    let scores = ScoreSet::generate(seed);

    FortuneRecord {
        date: format_date(date),
        kind,
        id: member.id,
        name: member.name,
        glyph: member.glyph,
        messages: Messages::select(seed, &scores),
        lucky: LuckyAttributes::generate(seed),
        scores,
    }
}
