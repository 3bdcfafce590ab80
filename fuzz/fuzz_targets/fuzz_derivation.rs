#![no_main]

use coded_errors::format::Arg;
use coded_errors::{Catalog, ErrorCode, Status};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 8 {
        return;
    }
    let code = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
    let status = i32::from_le_bytes([data[4], data[5], data[6], data[7]]);
    let text = String::from_utf8_lossy(&data[8..]).into_owned();

    let mut catalog = Catalog::with_builtins();
    let Ok(template) =
        catalog.try_register(ErrorCode::new(code), Status::new(status), text.clone())
    else {
        return;
    };
    let before = template.render();

    let err = template
        .clone_with_origin_error(text.clone())
        .clone_with_format(&[Arg::from(text.as_str()), Arg::from(code)])
        .clone_with_hint(text);

    let _ = err.render();
    let _ = format!("{err:#}");
    let mut line = String::new();
    let _ = err.log_record().write_to(&mut line);

    assert_eq!(template.render(), before);
    assert!(err.is(&template));
});
