//! Sample learning content: 20 common radicals and 10 HSK-1 characters.
//! Ids are deterministic so reseeding is idempotent and characters can
//! reference the radicals that compose them.

use crate::db::postgres::PostgresStore;
use crate::models::{Character, Radical};

struct RadicalSeed {
    id: &'static str,
    character: &'static str,
    meaning: &'static str,
    stroke_count: i64,
    frequency: i64,
    examples: &'static [&'static str],
}

struct CharacterSeed {
    id: &'static str,
    hanzi: &'static str,
    pinyin: &'static str,
    meaning: &'static str,
    hsk_level: i64,
    frequency: i64,
    radicals: &'static [&'static str],
}

const RADICALS: &[RadicalSeed] = &[
    RadicalSeed { id: "rad-ren", character: "人", meaning: "person", stroke_count: 2, frequency: 95, examples: &["他", "你", "們"] },
    RadicalSeed { id: "rad-kou", character: "口", meaning: "mouth", stroke_count: 3, frequency: 90, examples: &["吃", "叫", "問"] },
    RadicalSeed { id: "rad-shou", character: "手", meaning: "hand", stroke_count: 4, frequency: 88, examples: &["打", "找", "拿"] },
    RadicalSeed { id: "rad-xin", character: "心", meaning: "heart", stroke_count: 4, frequency: 85, examples: &["想", "思", "愛"] },
    RadicalSeed { id: "rad-shui", character: "水", meaning: "water", stroke_count: 4, frequency: 87, examples: &["河", "海", "湖"] },
    RadicalSeed { id: "rad-mu", character: "木", meaning: "tree/wood", stroke_count: 4, frequency: 84, examples: &["林", "森", "樹"] },
    RadicalSeed { id: "rad-huo", character: "火", meaning: "fire", stroke_count: 4, frequency: 80, examples: &["炎", "燒", "熱"] },
    RadicalSeed { id: "rad-tu", character: "土", meaning: "earth/soil", stroke_count: 3, frequency: 82, examples: &["地", "場", "城"] },
    RadicalSeed { id: "rad-ri", character: "日", meaning: "sun/day", stroke_count: 4, frequency: 92, examples: &["明", "時", "晚"] },
    RadicalSeed { id: "rad-yue", character: "月", meaning: "moon/month", stroke_count: 4, frequency: 86, examples: &["明", "期", "朋"] },
    RadicalSeed { id: "rad-yan", character: "言", meaning: "speech/words", stroke_count: 7, frequency: 83, examples: &["話", "說", "語"] },
    RadicalSeed { id: "rad-mi", character: "糸", meaning: "thread/silk", stroke_count: 6, frequency: 75, examples: &["紅", "緣", "線"] },
    RadicalSeed { id: "rad-nu", character: "女", meaning: "woman", stroke_count: 3, frequency: 81, examples: &["她", "好", "媽"] },
    RadicalSeed { id: "rad-zi", character: "子", meaning: "child", stroke_count: 3, frequency: 79, examples: &["學", "字", "孩"] },
    RadicalSeed { id: "rad-yi", character: "一", meaning: "one", stroke_count: 1, frequency: 100, examples: &["二", "三", "天"] },
    RadicalSeed { id: "rad-er", character: "二", meaning: "two", stroke_count: 2, frequency: 98, examples: &["三", "王", "元"] },
    RadicalSeed { id: "rad-zhu", character: "竹", meaning: "bamboo", stroke_count: 6, frequency: 70, examples: &["筆", "笑", "等"] },
    RadicalSeed { id: "rad-yu", character: "雨", meaning: "rain", stroke_count: 8, frequency: 72, examples: &["雪", "雲", "電"] },
    RadicalSeed { id: "rad-jin", character: "金", meaning: "metal/gold", stroke_count: 8, frequency: 76, examples: &["銀", "錢", "鐵"] },
    RadicalSeed { id: "rad-men", character: "門", meaning: "gate/door", stroke_count: 8, frequency: 74, examples: &["開", "閉", "間"] },
];

const CHARACTERS: &[CharacterSeed] = &[
    CharacterSeed { id: "char-hao", hanzi: "好", pinyin: "hǎo", meaning: "good, well", hsk_level: 1, frequency: 95, radicals: &["rad-nu", "rad-zi"] },
    CharacterSeed { id: "char-ni", hanzi: "你", pinyin: "nǐ", meaning: "you", hsk_level: 1, frequency: 100, radicals: &["rad-ren"] },
    CharacterSeed { id: "char-wo", hanzi: "我", pinyin: "wǒ", meaning: "I, me", hsk_level: 1, frequency: 98, radicals: &["rad-shou"] },
    CharacterSeed { id: "char-ta", hanzi: "他", pinyin: "tā", meaning: "he, him", hsk_level: 1, frequency: 97, radicals: &["rad-ren"] },
    CharacterSeed { id: "char-men", hanzi: "們", pinyin: "men", meaning: "plural marker", hsk_level: 1, frequency: 92, radicals: &["rad-ren", "rad-men"] },
    CharacterSeed { id: "char-shuo", hanzi: "說", pinyin: "shuō", meaning: "to say, to speak", hsk_level: 1, frequency: 90, radicals: &["rad-yan"] },
    CharacterSeed { id: "char-xue", hanzi: "學", pinyin: "xué", meaning: "to learn, to study", hsk_level: 1, frequency: 89, radicals: &["rad-zi"] },
    CharacterSeed { id: "char-zhong", hanzi: "中", pinyin: "zhōng", meaning: "middle, center, China", hsk_level: 1, frequency: 96, radicals: &["rad-kou"] },
    CharacterSeed { id: "char-guo", hanzi: "國", pinyin: "guó", meaning: "country, nation", hsk_level: 1, frequency: 94, radicals: &["rad-kou", "rad-yi"] },
    CharacterSeed { id: "char-ren", hanzi: "人", pinyin: "rén", meaning: "person, people", hsk_level: 1, frequency: 99, radicals: &["rad-ren"] },
];

pub fn sample_radicals() -> Vec<Radical> {
    RADICALS
        .iter()
        .map(|seed| Radical {
            id: seed.id.to_string(),
            character: seed.character.to_string(),
            meaning: seed.meaning.to_string(),
            stroke_count: seed.stroke_count,
            frequency: seed.frequency,
            examples: seed.examples.iter().map(|e| e.to_string()).collect(),
        })
        .collect()
}

pub fn sample_characters() -> Vec<Character> {
    CHARACTERS
        .iter()
        .map(|seed| Character {
            id: seed.id.to_string(),
            hanzi: seed.hanzi.to_string(),
            pinyin: seed.pinyin.to_string(),
            meaning: seed.meaning.to_string(),
            hsk_level: seed.hsk_level,
            frequency: seed.frequency,
            radicals: seed.radicals.iter().map(|r| r.to_string()).collect(),
        })
        .collect()
}

/// Insert the sample content, skipping rows that already exist.
pub async fn seed_content(store: &PostgresStore) {
    let pool = store.pool();

    for radical in sample_radicals() {
        if let Err(err) = sqlx::query(
            r#"
            INSERT INTO "radicals" ("id","character","meaning","strokeCount","frequency","examples")
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT ("id") DO NOTHING
            "#,
        )
        .bind(&radical.id)
        .bind(&radical.character)
        .bind(&radical.meaning)
        .bind(radical.stroke_count)
        .bind(radical.frequency)
        .bind(&radical.examples)
        .execute(pool)
        .await
        {
            tracing::warn!(error = %err, radical = %radical.id, "failed to seed radical");
        }
    }

    for character in sample_characters() {
        if let Err(err) = sqlx::query(
            r#"
            INSERT INTO "characters" ("id","hanzi","pinyin","meaning","hskLevel","frequency","radicals")
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT ("id") DO NOTHING
            "#,
        )
        .bind(&character.id)
        .bind(&character.hanzi)
        .bind(&character.pinyin)
        .bind(&character.meaning)
        .bind(character.hsk_level)
        .bind(character.frequency)
        .bind(&character.radicals)
        .execute(pool)
        .await
        {
            tracing::warn!(error = %err, character = %character.id, "failed to seed character");
        }
    }

    tracing::info!(
        radicals = RADICALS.len(),
        characters = CHARACTERS.len(),
        "sample content seeded"
    );
}
