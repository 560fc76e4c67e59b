//! Static game catalogue
//!
//! The therapy games are identified by opaque ids in the user documents; the
//! display names shown in the dashboard live here (same table the frontend
//! uses).

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Display names keyed by game id
pub static GAME_NAMES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("1f0c6da3-9f51-4f2b-8a36-6c3a1f2d9e44", "Стежка звірят"),
        ("8b21e7c5-40aa-4c19-9d8e-f1a4b5c6d7e8", "Зоряна куля"),
        ("3e9d2b71-6c54-4a0f-b8d2-5e6f7a8b9c0d", "Хрестики"),
        ("c4a85f12-7d3e-4b96-a1c8-2d3e4f5a6b7c", "Тандем"),
        ("7f6e5d4c-3b2a-4190-8f7e-6d5c4b3a2918", "Полювання на качок"),
        ("a1b2c3d4-e5f6-4789-90ab-cdef01234567", "Фузіо гоу +"),
        ("b2c3d4e5-f6a7-4890-a1bc-def012345678", "Фузіо гоу -"),
        ("c3d4e5f6-a7b8-4901-b2cd-ef0123456789", "Фузіо гоу"),
        ("d4e5f6a7-b8c9-4012-c3de-f01234567890", "Фузіо Дуо"),
        ("e5f6a7b8-c9d0-4123-d4ef-012345678901", "Автострада +"),
        ("f6a7b8c9-d0e1-4234-e5f0-123456789012", "Автострада -"),
        ("06b9c8d7-e2f3-4345-f601-234567890123", "Понад хмарами"),
        ("17c0d9e8-f3a4-4456-0712-345678901234", "Чарівні фрукти"),
        ("28d1e0f9-a4b5-4567-1823-456789012345", "Пазли"),
        ("39e2f1a0-b5c6-4678-2934-567890123456", "Формоленд"),
        ("4af3a2b1-c6d7-4789-3a45-678901234567", "Павучок"),
        ("5ba4b3c2-d7e8-489a-4b56-789012345678", "Тетріс"),
        ("6cb5c4d3-e8f9-49ab-5c67-890123456789", "Твістер"),
    ])
});

/// Human-readable name for a game id, falling back to the raw id for games
/// that are not in the catalogue yet.
pub fn game_display_name(id: &str) -> String {
    GAME_NAMES
        .get(id)
        .map(|name| (*name).to_string())
        .unwrap_or_else(|| id.to_string())
}
