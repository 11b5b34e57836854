//! Symbol pronunciations and Latin-script transliteration tables

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Spoken Russian form of a punctuation/symbol character.
///
/// Replacements carry their own surrounding spaces; runs of whitespace
/// are collapsed afterwards by the normalizer.
pub fn spoken_symbol(ch: char) -> Option<&'static str> {
    let word = match ch {
        '+' => " плюс ",
        '-' => " минус ",
        '*' => " умножить на ",
        '/' => " разделить на ",
        '&' => " и ",
        '@' => " собака ",
        '$' => " доллар ",
        '#' => " решётка ",
        '%' => " процент ",
        '=' => " равно ",
        '<' => " меньше ",
        '>' => " больше ",
        '^' => " в степени ",
        '~' => " примерно ",
        '|' => " или ",
        '\\' => " обратный слэш ",
        '`' => " гравис ",
        '"' => " кавычки ",
        '\'' => " апостроф ",
        '(' => " скобка открывается ",
        ')' => " скобка закрывается ",
        _ => return None,
    };
    Some(word)
}

/// Spoken Russian name of a Latin letter, used for initialisms and
/// words absent from [`TRANS_MAP`]. Case-insensitive.
pub fn letter_name(ch: char) -> Option<&'static str> {
    let name = match ch.to_ascii_lowercase() {
        'a' => "эй",
        'b' => "би",
        'c' => "си",
        'd' => "ди",
        'e' => "и",
        'f' => "эф",
        'g' => "джи",
        'h' => "эйч",
        'i' => "ай",
        'j' => "джей",
        'k' => "кей",
        'l' => "эль",
        'm' => "эм",
        'n' => "эн",
        'o' => "оу",
        'p' => "пи",
        'q' => "кью",
        'r' => "ар",
        's' => "эс",
        't' => "ти",
        'u' => "ю",
        'v' => "ви",
        'w' => "дабл-ю",
        'x' => "икс",
        'y' => "уай",
        'z' => "зед",
        _ => return None,
    };
    Some(name)
}

/// Known Latin words with an established Russian pronunciation.
///
/// Looked up on the lowercased word before falling back to
/// letter-by-letter transliteration.
pub static TRANS_MAP: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("android", "андроид"),
        ("bluetooth", "блютус"),
        ("chrome", "хром"),
        ("email", "имейл"),
        ("firefox", "файрфокс"),
        ("google", "гугл"),
        ("hello", "хеллоу"),
        ("internet", "интернет"),
        ("iphone", "айфон"),
        ("linux", "линукс"),
        ("no", "ноу"),
        ("ok", "окей"),
        ("okay", "окей"),
        ("online", "онлайн"),
        ("python", "питон"),
        ("rust", "раст"),
        ("smartphone", "смартфон"),
        ("telegram", "телеграм"),
        ("update", "апдейт"),
        ("usb", "ю-эс-би"),
        ("whatsapp", "вотсап"),
        ("wifi", "вай-фай"),
        ("windows", "виндоус"),
        ("yandex", "яндекс"),
        ("yes", "йес"),
        ("youtube", "ютуб"),
    ])
});
