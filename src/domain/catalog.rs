use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which category family a member belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FortuneType {
    Zodiac,
    Horoscope,
}

impl FortuneType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FortuneType::Zodiac => "zodiac",
            FortuneType::Horoscope => "horoscope",
        }
    }

    pub fn members(&self) -> &'static [CategoryMember] {
        match self {
            FortuneType::Zodiac => ZODIAC,
            FortuneType::Horoscope => HOROSCOPE,
        }
    }

    pub fn find(&self, id: &str) -> Option<&'static CategoryMember> {
        self.members().iter().find(|m| m.id == id)
    }
}

impl fmt::Display for FortuneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FortuneType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zodiac" => Ok(FortuneType::Zodiac),
            "horoscope" => Ok(FortuneType::Horoscope),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Fire,
    Earth,
    Air,
    Water,
}

/// Extra detail only horoscope members carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignDetail {
    pub english_name: &'static str,
    pub date_range: &'static str,
    pub element: Element,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryMember {
    pub id: &'static str,
    pub name: &'static str,
    pub glyph: &'static str,
    #[serde(flatten)]
    pub sign: Option<SignDetail>,
}

const fn animal(id: &'static str, name: &'static str, glyph: &'static str) -> CategoryMember {
    CategoryMember { id, name, glyph, sign: None }
}

const fn sign(
    id: &'static str,
    name: &'static str,
    glyph: &'static str,
    english_name: &'static str,
    date_range: &'static str,
    element: Element,
) -> CategoryMember {
    CategoryMember {
        id,
        name,
        glyph,
        sign: Some(SignDetail { english_name, date_range, element }),
    }
}

// Catalog order is the ranking tie-break; do not reorder.
pub const ZODIAC: &[CategoryMember] = &[
    animal("rat", "쥐띠", "🐭"),
    animal("ox", "소띠", "🐮"),
    animal("tiger", "호랑이띠", "🐯"),
    animal("rabbit", "토끼띠", "🐰"),
    animal("dragon", "용띠", "🐲"),
    animal("snake", "뱀띠", "🐍"),
    animal("horse", "말띠", "🐴"),
    animal("sheep", "양띠", "🐑"),
    animal("monkey", "원숭이띠", "🐵"),
    animal("rooster", "닭띠", "🐔"),
    animal("dog", "개띠", "🐶"),
    animal("pig", "돼지띠", "🐷"),
];

pub const HOROSCOPE: &[CategoryMember] = &[
    sign("aries", "양자리", "♈", "Aries", "3월 21일 - 4월 19일", Element::Fire),
    sign("taurus", "황소자리", "♉", "Taurus", "4월 20일 - 5월 20일", Element::Earth),
    sign("gemini", "쌍둥이자리", "♊", "Gemini", "5월 21일 - 6월 20일", Element::Air),
    sign("cancer", "게자리", "♋", "Cancer", "6월 21일 - 7월 22일", Element::Water),
    sign("leo", "사자자리", "♌", "Leo", "7월 23일 - 8월 22일", Element::Fire),
    sign("virgo", "처녀자리", "♍", "Virgo", "8월 23일 - 9월 22일", Element::Earth),
    sign("libra", "천칭자리", "♎", "Libra", "9월 23일 - 10월 22일", Element::Air),
    sign("scorpio", "전갈자리", "♏", "Scorpio", "10월 23일 - 11월 21일", Element::Water),
    sign("sagittarius", "사수자리", "♐", "Sagittarius", "11월 22일 - 12월 21일", Element::Fire),
    sign("capricorn", "염소자리", "♑", "Capricorn", "12월 22일 - 1월 19일", Element::Earth),
    sign("aquarius", "물병자리", "♒", "Aquarius", "1월 20일 - 2월 18일", Element::Air),
    sign("pisces", "물고기자리", "♓", "Pisces", "2월 19일 - 3월 20일", Element::Water),
];
