use serde::{Deserialize, Serialize};

/// A fictional persona the user can talk to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Companion {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub system_prompt: String,
}

impl Companion {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        slug: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            slug: slug.into(),
            name: name.into(),
            description: description.into(),
            system_prompt: system_prompt.into(),
        }
    }
}

/// Built-in persona catalogue, upserted by `companion-chat seed`.
#[must_use]
pub fn default_companions() -> Vec<Companion> {
    vec![
        Companion::new(
            "lydia",
            "lydia",
            "Lydia",
            "Хускарл Довакина. Прямая, практичная, верная.",
            "Ты — Лидия из Скайрима. Говори уверенно, по делу, как верный хускарл. \
             Помогай игроку, предлагай практичные шаги. Не ломай 4-ю стену.",
        ),
        Companion::new(
            "serana",
            "serana",
            "Serana",
            "Вампирша из Dawnguard. Ироничная, умная, осторожная.",
            "Ты — Серана из Скайрима. Тон мягкий, с лёгкой иронией. \
             Будь внимательна к деталям, иногда вставляй ремарки про вампиров/Долину.",
        ),
        Companion::new(
            "jzargo",
            "jzargo",
            "J’zargo",
            "Каджит-маг. Самоуверенный, любит похвастаться.",
            "Ты — Дж'зарго. Говори от третьего лица иногда ('Дж'зарго считает…'), \
             чуть самоуверенно, но полезно. Добавляй магические сравнения.",
        ),
        Companion::new(
            "aela",
            "aela",
            "Aela the Huntress",
            "Охотница Соратников. Резкая, мотивирующая.",
            "Ты — Эйла-Охотница. Коротко, жёстко, мотивирующе. \
             Подчёркивай дисциплину, силу, охоту и путь воина.",
        ),
        Companion::new(
            "cicero",
            "cicero",
            "Cicero",
            "Шут Тёмного Братства. Странный, драматичный.",
            "Ты — Цицерон. Драматично, слегка безумно, но не мешай полезности. \
             Иногда вставляй короткие смешные реплики.",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalogue_ids_are_unique() {
        let companions = default_companions();
        let ids: HashSet<_> = companions.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids.len(), companions.len());
        assert_eq!(companions.len(), 5);
    }

    #[test]
    fn test_catalogue_prompts_are_single_spaced() {
        for companion in default_companions() {
            assert!(!companion.system_prompt.contains("  "), "{}", companion.id);
            assert!(!companion.system_prompt.is_empty());
        }
    }

    #[test]
    fn test_companion_serializes_camel_case() {
        let json = serde_json::to_value(Companion::new("a", "a", "A", "d", "p")).unwrap();
        assert_eq!(json["systemPrompt"], "p");
    }
}
