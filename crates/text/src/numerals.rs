//! Spelled-out Russian cardinals
//!
//! Covers the full `u64` range (through the quintillions), with the
//! feminine agreement the thousands group requires.

const UNITS: [&str; 10] = [
    "",
    "один",
    "два",
    "три",
    "четыре",
    "пять",
    "шесть",
    "семь",
    "восемь",
    "девять",
];

const TEENS: [&str; 10] = [
    "десять",
    "одиннадцать",
    "двенадцать",
    "тринадцать",
    "четырнадцать",
    "пятнадцать",
    "шестнадцать",
    "семнадцать",
    "восемнадцать",
    "девятнадцать",
];

const TENS: [&str; 10] = [
    "",
    "",
    "двадцать",
    "тридцать",
    "сорок",
    "пятьдесят",
    "шестьдесят",
    "семьдесят",
    "восемьдесят",
    "девяносто",
];

const HUNDREDS: [&str; 10] = [
    "",
    "сто",
    "двести",
    "триста",
    "четыреста",
    "пятьсот",
    "шестьсот",
    "семьсот",
    "восемьсот",
    "девятьсот",
];

/// Scale word in its three plural forms: one (21), few (2..4), many (5..).
struct Scale {
    one: &'static str,
    few: &'static str,
    many: &'static str,
    feminine: bool,
}

const SCALES: [Scale; 6] = [
    Scale { one: "тысяча", few: "тысячи", many: "тысяч", feminine: true },
    Scale { one: "миллион", few: "миллиона", many: "миллионов", feminine: false },
    Scale { one: "миллиард", few: "миллиарда", many: "миллиардов", feminine: false },
    Scale { one: "триллион", few: "триллиона", many: "триллионов", feminine: false },
    Scale { one: "квадриллион", few: "квадриллиона", many: "квадриллионов", feminine: false },
    Scale { one: "квинтиллион", few: "квинтиллиона", many: "квинтиллионов", feminine: false },
];

/// Spell out `n` as a Russian cardinal, e.g. `125` → "сто двадцать пять".
pub fn cardinal(n: u64) -> String {
    if n == 0 {
        return "ноль".to_string();
    }

    // Split into base-1000 groups, least significant first.
    let mut groups = Vec::new();
    let mut rest = n;
    while rest > 0 {
        groups.push((rest % 1000) as u16);
        rest /= 1000;
    }

    let mut words: Vec<&str> = Vec::new();
    for (idx, &group) in groups.iter().enumerate().rev() {
        if group == 0 {
            continue;
        }
        push_triple(&mut words, group, idx > 0 && SCALES[idx - 1].feminine);
        if idx > 0 {
            let scale = &SCALES[idx - 1];
            words.push(match plural_index(group) {
                0 => scale.one,
                1 => scale.few,
                _ => scale.many,
            });
        }
    }
    words.join(" ")
}

/// Spell out a 1..=999 group. `feminine` selects "одна"/"две" for the
/// thousands group.
fn push_triple(words: &mut Vec<&'static str>, n: u16, feminine: bool) {
    let hundreds = (n / 100) as usize;
    let below = n % 100;

    if hundreds > 0 {
        words.push(HUNDREDS[hundreds]);
    }
    if (10..20).contains(&below) {
        words.push(TEENS[(below - 10) as usize]);
    } else {
        let tens = (below / 10) as usize;
        let units = (below % 10) as usize;
        if tens > 0 {
            words.push(TENS[tens]);
        }
        if units > 0 {
            words.push(match (units, feminine) {
                (1, true) => "одна",
                (2, true) => "две",
                _ => UNITS[units],
            });
        }
    }
}

/// 0 = one form (21, 101), 1 = few form (2..4, 22..24), 2 = many form.
fn plural_index(group: u16) -> usize {
    let two = group % 100;
    let one = group % 10;
    if (11..=14).contains(&two) {
        2
    } else if one == 1 {
        0
    } else if (2..=4).contains(&one) {
        1
    } else {
        2
    }
}
