use rand::Rng;
use rand::seq::IndexedRandom;
use spinwheel::{Instructions, Language, ResultCard, TimeBucket};

/// User-facing labels for one language.
pub struct Strings {
    pub title: &'static str,
    pub spin: &'static str,
    pub cuisine: &'static str,
    pub time: &'static str,
    pub all_cuisines: &'static str,
    pub time_all: &'static str,
    pub time_quick: &'static str,
    pub time_medium: &'static str,
    pub time_long: &'static str,
    pub prompt: &'static str,
    pub loading: &'static str,
    pub no_match: &'static str,
    pub empty_slot: &'static str,
    pub country: &'static str,
    pub difficulty: &'static str,
    pub cooking: &'static str,
    pub preparation: &'static str,
    pub servings: &'static str,
    pub minutes: &'static str,
    pub no_instructions: &'static str,
    pub switch_language: &'static str,
}

pub const EN: Strings = Strings {
    title: "What should I eat?",
    spin: "Spin!",
    cuisine: "Cuisine",
    time: "Time",
    all_cuisines: "All cuisines",
    time_all: "Any time",
    time_quick: "Quick (under 30 min)",
    time_medium: "Medium (30 to 60 min)",
    time_long: "Long (over 60 min)",
    prompt: "Spin the wheel to pick a dish",
    loading: "Loading recipes…",
    no_match: "Nothing matches, showing every recipe",
    empty_slot: "Empty slot, spin again!",
    country: "Cuisine",
    difficulty: "Difficulty",
    cooking: "Cooking",
    preparation: "Preparation",
    servings: "Serves",
    minutes: "min",
    no_instructions: "No instructions available.",
    switch_language: "فارسی",
};

pub const FA: Strings = Strings {
    title: "امروز چی بخوریم؟",
    spin: "بچرخون!",
    cuisine: "آشپزی",
    time: "زمان",
    all_cuisines: "همه",
    time_all: "هر زمانی",
    time_quick: "سریع (کمتر از ۳۰ دقیقه)",
    time_medium: "متوسط (۳۰ تا ۶۰ دقیقه)",
    time_long: "طولانی (بیشتر از ۶۰ دقیقه)",
    prompt: "چرخ را بچرخانید تا غذا انتخاب شود",
    loading: "در حال بارگذاری…",
    no_match: "غذایی پیدا نشد، همه نمایش داده می‌شوند",
    empty_slot: "خانه خالی، دوباره بچرخانید!",
    country: "کشور",
    difficulty: "سختی",
    cooking: "پخت",
    preparation: "آماده‌سازی",
    servings: "تعداد نفرات",
    minutes: "دقیقه",
    no_instructions: "دستور پختی موجود نیست.",
    switch_language: "English",
};

pub fn strings(language: Language) -> &'static Strings {
    match language {
        Language::En => &EN,
        Language::Fa => &FA,
    }
}

const FOOD_EMOJI: &[&str] = &[
    "🍕", "🍝", "🍜", "🍛", "🍲", "🥘", "🌮", "🍣", "🥗", "🍔", "🥙", "🍱",
];

pub fn random_food_emoji<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    FOOD_EMOJI.choose(rng).copied().unwrap_or("🍽")
}

impl Strings {
    pub fn time_label(&self, bucket: TimeBucket) -> &'static str {
        match bucket {
            TimeBucket::All => self.time_all,
            TimeBucket::Quick => self.time_quick,
            TimeBucket::Medium => self.time_medium,
            TimeBucket::Long => self.time_long,
        }
    }

    /// Facts block for the result panel; rows with no data are left out.
    pub fn card_details(&self, card: &ResultCard) -> String {
        let mut rows = vec![
            format!("{}: {}", self.country, card.country),
            format!("{}: {}", self.difficulty, card.difficulty.stars()),
        ];
        if let Some(minutes) = card.cooking_minutes {
            rows.push(format!("{}: {} {}", self.cooking, minutes, self.minutes));
        }
        if let Some(minutes) = card.prepare_minutes {
            rows.push(format!("{}: {} {}", self.preparation, minutes, self.minutes));
        }
        if let Some(servings) = card.servings {
            rows.push(format!("{}: {}", self.servings, servings));
        }
        rows.join("\n")
    }

    pub fn instructions<'a>(&self, card: &'a ResultCard) -> &'a str {
        match &card.instructions {
            Instructions::Provided(text) => text,
            Instructions::Missing => self.no_instructions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use spinwheel::result::CountryNames;
    use spinwheel::{CountryCode, Recipe};
    use std::collections::HashMap;
    use strum::IntoEnumIterator;

    fn card(recipe: &Recipe) -> ResultCard {
        let names: HashMap<CountryCode, String> = HashMap::new();
        ResultCard::for_recipe(recipe, &names as &dyn CountryNames)
    }

    #[test]
    fn test_every_time_bucket_has_a_label() {
        for strings in [&EN, &FA] {
            for bucket in TimeBucket::iter() {
                assert!(!strings.time_label(bucket).is_empty());
            }
        }
    }

    #[test]
    fn test_details_skip_missing_rows() {
        let bare = card(&Recipe::new("1", "Toast", "GB"));
        assert_eq!(EN.card_details(&bare), "Cuisine: GB\nDifficulty: ⭐☆☆");

        let full = card(&Recipe::new("2", "Stew", "IR").with_times(40, 10).with_servings(3));
        let details = EN.card_details(&full);
        assert!(details.contains("Cooking: 40 min"));
        assert!(details.contains("Preparation: 10 min"));
        assert!(details.contains("Serves: 3"));
        assert!(details.contains("⭐⭐☆"));
    }

    #[test]
    fn test_missing_instructions_are_localized() {
        let bare = card(&Recipe::new("1", "Toast", "GB"));
        assert_eq!(EN.instructions(&bare), EN.no_instructions);
        assert_eq!(FA.instructions(&bare), FA.no_instructions);
    }

    #[test]
    fn test_emoji_comes_from_the_food_set() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            assert!(FOOD_EMOJI.contains(&random_food_emoji(&mut rng)));
        }
    }
}
