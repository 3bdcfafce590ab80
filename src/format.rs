//! Printf-style message formatting for template messages.
//!
//! Template messages are written once, at registration, with `%` verbs
//! (`"failed a=%d"`) and filled in per call site by
//! [`Error::clone_with_format`](crate::Error::clone_with_format). Because the
//! template is data rather than a literal, `format!` cannot be used; this
//! module interprets it at runtime instead.
//!
//! # Verbs
//!
//! | verb | accepts | output |
//! |---|---|---|
//! | `%v` | anything | natural form |
//! | `%s` | strings, chars, display values | text, `.N` truncates to N chars |
//! | `%q` | strings, chars, display values | quoted and escaped |
//! | `%d` | integers, chars | decimal |
//! | `%x` `%X` | integers, strings | hexadecimal |
//! | `%o` `%b` | integers | octal, binary |
//! | `%c` | integers, chars | the character |
//! | `%f` `%e` `%E` `%g` | floats | fixed, exponent, shortest; `.N` precision |
//! | `%t` | bools | `true` / `false` |
//! | `%%` | nothing | a literal `%` |
//!
//! Flags `-` (left align), `+` (always signed) and `0` (zero pad) and a
//! decimal width may precede the verb.
//!
//! # Mismatches
//!
//! Formatting never fails. Problems are reported inline:
//!
//! - `%!d(string=abc)`: argument of the wrong kind for the verb (also used
//!   for unknown verbs)
//! - `%!d(MISSING)`: more verbs than arguments
//! - `%!(EXTRA int=1, string=x)`: more arguments than verbs
//! - `%!(NOVERB)`: the template ends with a bare `%`
//! - `%!(BADWIDTH)` / `%!(BADPREC)`: width or precision above one million
//!
//! ```rust
//! use coded_errors::format::{sprintf, Arg};
//!
//! assert_eq!(sprintf("failed a=%d", &[Arg::from(5)]), "failed a=5");
//! assert_eq!(sprintf("took %.2fs", &[Arg::from(1.5)]), "took 1.50s");
//! assert_eq!(sprintf("a=%d", &[Arg::from("x")]), "a=%!d(string=x)");
//! ```

use crate::{ErrorCode, Status};
use std::borrow::Cow;
use std::fmt::{self, Write};
use std::iter::Peekable;
use std::str::Chars;

/// A single formatting argument.
#[derive(Clone)]
pub enum Arg<'a> {
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    Uint(u64),
    /// Floating point number.
    Float(f64),
    /// Boolean.
    Bool(bool),
    /// Single character.
    Char(char),
    /// Text.
    Str(Cow<'a, str>),
    /// Anything with a `Display` impl; treated as text.
    Display(&'a dyn fmt::Display),
}

impl<'a> Arg<'a> {
    /// Wrap any `Display` value.
    pub fn display(value: &'a dyn fmt::Display) -> Self {
        Arg::Display(value)
    }

    /// Type label used in mismatch markers.
    pub fn type_name(&self) -> &'static str {
        match self {
            Arg::Int(_) => "int",
            Arg::Uint(_) => "uint",
            Arg::Float(_) => "float64",
            Arg::Bool(_) => "bool",
            Arg::Char(_) => "char",
            Arg::Str(_) => "string",
            Arg::Display(_) => "value",
        }
    }

    fn text(&self) -> Option<Cow<'_, str>> {
        match self {
            Arg::Str(s) => Some(Cow::Borrowed(s.as_ref())),
            Arg::Display(d) => Some(Cow::Owned(d.to_string())),
            Arg::Char(c) => Some(Cow::Owned(c.to_string())),
            _ => None,
        }
    }

    fn is_numeric(&self) -> bool {
        matches!(self, Arg::Int(_) | Arg::Uint(_) | Arg::Float(_))
    }
}

impl fmt::Debug for Arg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.type_name(), natural(self))
    }
}

macro_rules! signed_arg {
    ($($t:ty),+) => {
        $(
            impl From<$t> for Arg<'_> {
                fn from(value: $t) -> Self {
                    Arg::Int(value as i64)
                }
            }
        )+
    };
}

macro_rules! unsigned_arg {
    ($($t:ty),+) => {
        $(
            impl From<$t> for Arg<'_> {
                fn from(value: $t) -> Self {
                    Arg::Uint(value as u64)
                }
            }
        )+
    };
}

signed_arg!(i8, i16, i32, i64, isize);
unsigned_arg!(u8, u16, u32, u64, usize);

impl From<f32> for Arg<'_> {
    fn from(value: f32) -> Self {
        Arg::Float(f64::from(value))
    }
}

impl From<f64> for Arg<'_> {
    fn from(value: f64) -> Self {
        Arg::Float(value)
    }
}

impl From<bool> for Arg<'_> {
    fn from(value: bool) -> Self {
        Arg::Bool(value)
    }
}

impl From<char> for Arg<'_> {
    fn from(value: char) -> Self {
        Arg::Char(value)
    }
}

impl<'a> From<&'a str> for Arg<'a> {
    fn from(value: &'a str) -> Self {
        Arg::Str(Cow::Borrowed(value))
    }
}

impl<'a> From<&'a String> for Arg<'a> {
    fn from(value: &'a String) -> Self {
        Arg::Str(Cow::Borrowed(value.as_str()))
    }
}

impl From<String> for Arg<'_> {
    fn from(value: String) -> Self {
        Arg::Str(Cow::Owned(value))
    }
}

impl<'a> From<Cow<'a, str>> for Arg<'a> {
    fn from(value: Cow<'a, str>) -> Self {
        Arg::Str(value)
    }
}

impl From<ErrorCode> for Arg<'_> {
    fn from(value: ErrorCode) -> Self {
        Arg::Uint(u64::from(value.value()))
    }
}

impl From<Status> for Arg<'_> {
    fn from(value: Status) -> Self {
        Arg::Int(i64::from(value.value()))
    }
}

/// Widths and precisions above this are rejected with a marker.
const MAX_PADDING: usize = 1_000_000;

#[derive(Debug, Default)]
struct Spec {
    left: bool,
    plus: bool,
    zero: bool,
    width: Option<usize>,
    precision: Option<usize>,
}

/// Substitute `args` into `template`.
pub fn sprintf(template: &str, args: &[Arg<'_>]) -> String {
    let mut out = String::with_capacity(template.len() + 16);
    let mut next_arg = 0;
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }

        let mut spec = Spec::default();
        while let Some(&flag) = chars.peek() {
            match flag {
                '-' => spec.left = true,
                '+' => spec.plus = true,
                '0' => spec.zero = true,
                _ => break,
            }
            chars.next();
        }
        spec.width = take_number(&mut chars);
        if spec.width.is_some_and(|w| w > MAX_PADDING) {
            spec.width = None;
            out.push_str("%!(BADWIDTH)");
        }
        if chars.peek() == Some(&'.') {
            chars.next();
            let precision = take_number(&mut chars).unwrap_or(0);
            if precision > MAX_PADDING {
                out.push_str("%!(BADPREC)");
            } else {
                spec.precision = Some(precision);
            }
        }

        let Some(verb) = chars.next() else {
            out.push_str("%!(NOVERB)");
            break;
        };
        if verb == '%' {
            out.push('%');
            continue;
        }

        match args.get(next_arg) {
            None => {
                let _ = write!(out, "%!{verb}(MISSING)");
            }
            Some(arg) => {
                next_arg += 1;
                match render(verb, &spec, arg) {
                    Some(body) => pad(&mut out, &body, &spec, arg.is_numeric() && verb != 'c'),
                    None => {
                        let _ = write!(out, "%!{verb}({}={})", arg.type_name(), natural(arg));
                    }
                }
            }
        }
    }

    if next_arg < args.len() {
        out.push_str("%!(EXTRA ");
        for (i, arg) in args[next_arg..].iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            let _ = write!(out, "{arg:?}");
        }
        out.push(')');
    }

    out
}

fn take_number(chars: &mut Peekable<Chars<'_>>) -> Option<usize> {
    let mut value: Option<usize> = None;
    while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
        chars.next();
        value = Some(
            value
                .unwrap_or(0)
                .saturating_mul(10)
                .saturating_add(digit as usize),
        );
    }
    value
}

/// `%v` rendering, also used inside mismatch markers.
fn natural(arg: &Arg<'_>) -> String {
    match arg {
        Arg::Int(v) => v.to_string(),
        Arg::Uint(v) => v.to_string(),
        Arg::Float(v) => float_general(*v, None),
        Arg::Bool(v) => v.to_string(),
        Arg::Char(v) => v.to_string(),
        Arg::Str(v) => v.to_string(),
        Arg::Display(v) => v.to_string(),
    }
}

fn render(verb: char, spec: &Spec, arg: &Arg<'_>) -> Option<String> {
    match arg {
        Arg::Int(v) => integer(*v < 0, v.unsigned_abs(), verb, spec),
        Arg::Uint(v) => integer(false, *v, verb, spec),
        Arg::Char(c) => match verb {
            'd' => integer(false, u64::from(u32::from(*c)), verb, spec),
            'c' | 'v' | 's' => Some(c.to_string()),
            'q' => Some(format!("{c:?}")),
            _ => None,
        },
        Arg::Float(v) => float(*v, verb, spec),
        Arg::Bool(v) => matches!(verb, 't' | 'v').then(|| v.to_string()),
        Arg::Str(_) | Arg::Display(_) => {
            let text = arg.text()?;
            string(&text, verb, spec)
        }
    }
}

fn integer(negative: bool, magnitude: u64, verb: char, spec: &Spec) -> Option<String> {
    let digits = match verb {
        'd' | 'v' => magnitude.to_string(),
        'x' => format!("{magnitude:x}"),
        'X' => format!("{magnitude:X}"),
        'o' => format!("{magnitude:o}"),
        'b' => format!("{magnitude:b}"),
        'c' => {
            let c = u32::try_from(magnitude)
                .ok()
                .filter(|_| !negative)
                .and_then(char::from_u32)
                .unwrap_or(char::REPLACEMENT_CHARACTER);
            return Some(c.to_string());
        }
        _ => return None,
    };
    Some(with_sign(negative, spec.plus, digits))
}

fn float(value: f64, verb: char, spec: &Spec) -> Option<String> {
    if !matches!(verb, 'v' | 'f' | 'F' | 'e' | 'E' | 'g' | 'G') {
        return None;
    }
    if value.is_nan() {
        return Some("NaN".to_owned());
    }
    if value.is_infinite() {
        let sign = if value < 0.0 { '-' } else { '+' };
        return Some(format!("{sign}Inf"));
    }

    let magnitude = value.abs();
    let body = match verb {
        'f' | 'F' => format!("{:.*}", spec.precision.unwrap_or(6), magnitude),
        'e' => float_exponent(magnitude, spec.precision.unwrap_or(6)),
        'E' => float_exponent(magnitude, spec.precision.unwrap_or(6)).to_uppercase(),
        'G' => float_general(magnitude, spec.precision).to_uppercase(),
        _ => float_general(magnitude, spec.precision),
    };
    Some(with_sign(value.is_sign_negative(), spec.plus, body))
}

/// `1.500000e+00` style: signed exponent of at least two digits.
fn float_exponent(magnitude: f64, precision: usize) -> String {
    normalize_exponent(&format!("{magnitude:.precision$e}"))
}

/// Shortest form, switching to exponent notation for very large or small
/// magnitudes. With a precision, that many significant digits.
fn float_general(value: f64, precision: Option<usize>) -> String {
    let magnitude = value.abs();
    let sign = if value.is_sign_negative() { "-" } else { "" };
    if magnitude == 0.0 {
        return format!("{sign}0");
    }

    let (scientific, threshold) = match precision {
        Some(p) => {
            let p = p.max(1);
            (format!("{:.*e}", p - 1, magnitude), p as i32)
        }
        None => (format!("{magnitude:e}"), 21),
    };
    let exponent = scientific
        .rsplit_once('e')
        .and_then(|(_, exp)| exp.parse::<i32>().ok())
        .unwrap_or(0);

    let body = if exponent < -4 || exponent >= threshold {
        let (mantissa, _) = scientific.split_once('e').unwrap_or((&scientific, ""));
        normalize_exponent(&format!("{}e{exponent}", trim_fraction(mantissa)))
    } else {
        match precision {
            Some(p) => {
                let decimals = (p.max(1) as i32 - 1 - exponent).max(0) as usize;
                trim_fraction(&format!("{magnitude:.decimals$}")).to_owned()
            }
            None => magnitude.to_string(),
        }
    };
    format!("{sign}{body}")
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

fn normalize_exponent(s: &str) -> String {
    match s.split_once('e') {
        Some((mantissa, exp)) => {
            let exp: i32 = exp.parse().unwrap_or(0);
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:02}", exp.unsigned_abs())
        }
        None => s.to_owned(),
    }
}

fn string(text: &str, verb: char, spec: &Spec) -> Option<String> {
    let text = match spec.precision {
        Some(p) if matches!(verb, 's' | 'v' | 'q') => match text.char_indices().nth(p) {
            Some((idx, _)) => &text[..idx],
            None => text,
        },
        _ => text,
    };
    match verb {
        's' | 'v' => Some(text.to_owned()),
        'q' => Some(format!("{text:?}")),
        'x' => Some(text.bytes().map(|b| format!("{b:02x}")).collect()),
        'X' => Some(text.bytes().map(|b| format!("{b:02X}")).collect()),
        _ => None,
    }
}

fn with_sign(negative: bool, plus: bool, body: String) -> String {
    if negative {
        format!("-{body}")
    } else if plus {
        format!("+{body}")
    } else {
        body
    }
}

fn pad(out: &mut String, body: &str, spec: &Spec, numeric: bool) {
    let len = body.chars().count();
    let Some(fill) = spec.width.filter(|w| *w > len).map(|w| w - len) else {
        out.push_str(body);
        return;
    };

    if spec.left {
        out.push_str(body);
        out.extend(std::iter::repeat_n(' ', fill));
    } else if spec.zero && numeric {
        let (sign, digits) = match body.chars().next() {
            Some(c @ ('-' | '+')) => body.split_at(c.len_utf8()),
            _ => ("", body),
        };
        out.push_str(sign);
        out.extend(std::iter::repeat_n('0', fill));
        out.push_str(digits);
    } else {
        out.extend(std::iter::repeat_n(' ', fill));
        out.push_str(body);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt1(template: &str, arg: impl Into<Arg<'static>>) -> String {
        sprintf(template, &[arg.into()])
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(sprintf("no verbs here", &[]), "no verbs here");
        assert_eq!(sprintf("100%% done", &[]), "100% done");
    }

    #[test]
    fn integers() {
        assert_eq!(fmt1("a=%d", 5), "a=5");
        assert_eq!(fmt1("%d", -42i64), "-42");
        assert_eq!(fmt1("%x", 255u8), "ff");
        assert_eq!(fmt1("%X", 255u8), "FF");
        assert_eq!(fmt1("%x", -255), "-ff");
        assert_eq!(fmt1("%o", 8), "10");
        assert_eq!(fmt1("%b", 5), "101");
        assert_eq!(fmt1("%v", 7usize), "7");
        assert_eq!(fmt1("%c", 65), "A");
        assert_eq!(fmt1("%+d", 3), "+3");
    }

    #[test]
    fn width_and_flags() {
        assert_eq!(fmt1("[%5d]", 42), "[   42]");
        assert_eq!(fmt1("[%-5d]", 42), "[42   ]");
        assert_eq!(fmt1("[%05d]", -42), "[-0042]");
        assert_eq!(fmt1("[%6s]", "ab"), "[    ab]");
    }

    #[test]
    fn floats() {
        assert_eq!(fmt1("%f", 1.5), "1.500000");
        assert_eq!(fmt1("%.2f", 3.14159), "3.14");
        assert_eq!(fmt1("%e", 1234.5678), "1.234568e+03");
        assert_eq!(fmt1("%E", 0.00012), "1.200000E-04");
        assert_eq!(fmt1("%v", 3.0), "3");
        assert_eq!(fmt1("%v", 0.25), "0.25");
        assert_eq!(fmt1("%g", 1e21), "1e+21");
        assert_eq!(fmt1("%g", 0.00001), "1e-05");
        assert_eq!(fmt1("%.3g", 3.14159), "3.14");
        assert_eq!(fmt1("%v", -2.5f32), "-2.5");
        assert_eq!(fmt1("%f", f64::NAN), "NaN");
        assert_eq!(fmt1("%v", f64::NEG_INFINITY), "-Inf");
    }

    #[test]
    fn strings() {
        assert_eq!(fmt1("hello %s", "world"), "hello world");
        assert_eq!(fmt1("%q", "a\"b"), "\"a\\\"b\"");
        assert_eq!(fmt1("%.3s", "abcdef"), "abc");
        assert_eq!(fmt1("%x", "hi"), "6869");
        assert_eq!(fmt1("%s", String::from("owned")), "owned");
        assert_eq!(fmt1("%c", 'z'), "z");
        assert_eq!(fmt1("%t", true), "true");
    }

    #[test]
    fn display_values() {
        let code = ErrorCode::TIMEOUT;
        assert_eq!(sprintf("code %s", &[Arg::display(&code)]), "code 3");
        assert_eq!(sprintf("code %d", &[Arg::from(code)]), "code 3");
        assert_eq!(sprintf("status %v", &[Arg::from(Status::new(408))]), "status 408");
    }

    #[test]
    fn mismatched_argument_is_marked() {
        assert_eq!(fmt1("a=%d", "x"), "a=%!d(string=x)");
        assert_eq!(fmt1("%s", 5), "%!s(int=5)");
        assert_eq!(fmt1("%t", 1u8), "%!t(uint=1)");
        assert_eq!(fmt1("%f", 2), "%!f(int=2)");
    }

    #[test]
    fn unknown_verb_is_marked() {
        assert_eq!(fmt1("%z", 1), "%!z(int=1)");
    }

    #[test]
    fn missing_argument_is_marked() {
        assert_eq!(sprintf("a=%d b=%s", &[Arg::from(1)]), "a=1 b=%!s(MISSING)");
    }

    #[test]
    fn extra_arguments_are_listed() {
        assert_eq!(
            sprintf("a=%d", &[Arg::from(1), Arg::from(2), Arg::from("x")]),
            "a=1%!(EXTRA int=2, string=x)"
        );
    }

    #[test]
    fn trailing_percent_is_marked() {
        assert_eq!(sprintf("50%", &[]), "50%!(NOVERB)");
    }

    #[test]
    fn multibyte_template_is_preserved() {
        assert_eq!(fmt1("超时 %d 秒", 30), "超时 30 秒");
    }

    #[test]
    fn oversized_width_and_precision_are_marked() {
        assert_eq!(fmt1("%99999999999d", 7), "%!(BADWIDTH)7");
        assert_eq!(fmt1("%.2000000f", 1.5), "%!(BADPREC)1.500000");
    }
}
