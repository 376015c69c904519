mod common;

use common::{INK, WHITE, blank, clear_rows, document, rgba, solid_text};
use slicepdf::paginate::{find_break, is_background_pixel, is_background_row, slice};

#[test]
fn pixel_within_tolerance_counts_as_background() {
    assert!(is_background_pixel(&[250, 255, 253, 255], WHITE, 5));
    assert!(!is_background_pixel(&[249, 255, 255, 255], WHITE, 5));
    assert!(is_background_pixel(&[5, 10, 21, 255], [5, 10, 21], 0));
}

#[test]
fn transparent_pixel_is_judged_against_the_page() {
    assert!(is_background_pixel(&[0, 0, 0, 0], WHITE, 5));
    assert!(!is_background_pixel(&[0, 0, 0, 128], WHITE, 5));
}

#[test]
fn one_inked_pixel_disqualifies_a_row() {
    let mut img = blank(50, 4, WHITE);
    img.put_pixel(49, 2, rgba(INK));
    let doc = document(img, 1.0, WHITE);
    assert!(is_background_row(&doc.bitmap, 1, WHITE, 5));
    assert!(!is_background_row(&doc.bitmap, 2, WHITE, 5));
    // same answer every time
    assert_eq!(
        is_background_row(&doc.bitmap, 2, WHITE, 5),
        is_background_row(&doc.bitmap, 2, WHITE, 5)
    );
}

#[test]
fn dark_theme_background_row() {
    let dark = [5, 10, 21];
    let doc = document(blank(20, 3, dark), 1.0, dark);
    assert!(is_background_row(&doc.bitmap, 0, dark, 5));
    assert!(!is_background_row(&doc.bitmap, 0, WHITE, 5));
}

#[test]
fn prefers_blank_row_above_hard_cut() {
    let mut img = solid_text(40, 5000, WHITE);
    clear_rows(&mut img, 1985, 1986, WHITE);
    let doc = document(img, 2.0, WHITE);
    assert_eq!(find_break(&doc.bitmap, 0, 2000, 200, WHITE, 5), 1985);
}

#[test]
fn picks_blank_row_closest_to_hard_cut() {
    let mut img = solid_text(40, 3000, WHITE);
    clear_rows(&mut img, 1900, 1901, WHITE);
    clear_rows(&mut img, 1990, 1991, WHITE);
    let doc = document(img, 1.0, WHITE);
    assert_eq!(find_break(&doc.bitmap, 0, 2000, 200, WHITE, 5), 1990);
}

#[test]
fn falls_back_to_hard_cut_without_blank_row() {
    let doc = document(solid_text(40, 3000, WHITE), 1.0, WHITE);
    assert_eq!(find_break(&doc.bitmap, 0, 2000, 200, WHITE, 5), 2000);
}

#[test]
fn blank_row_outside_window_is_ignored() {
    let mut img = solid_text(40, 3000, WHITE);
    clear_rows(&mut img, 1700, 1701, WHITE);
    let doc = document(img, 1.0, WHITE);
    assert_eq!(find_break(&doc.bitmap, 0, 2000, 200, WHITE, 5), 2000);
}

#[test]
fn final_page_is_never_adjusted() {
    let doc = document(blank(40, 1000, WHITE), 1.0, WHITE);
    assert_eq!(find_break(&doc.bitmap, 500, 1000, 200, WHITE, 5), 1000);
}

#[test]
fn never_breaks_at_page_start() {
    let mut img = solid_text(40, 1000, WHITE);
    clear_rows(&mut img, 100, 101, WHITE);
    let doc = document(img, 1.0, WHITE);
    // window reaches past the page start, but the start row itself is off limits
    assert_eq!(find_break(&doc.bitmap, 100, 150, 200, WHITE, 5), 150);
}

#[test]
fn slice_has_exact_dimensions_and_content() {
    let mut img = blank(30, 100, WHITE);
    img.put_pixel(7, 42, rgba(INK));
    let doc = document(img, 1.0, WHITE);
    let page = slice(&doc.bitmap, 40, 60, WHITE);
    assert_eq!(page.dimensions(), (30, 20));
    assert_eq!(page.get_pixel(7, 2).0, INK);
    assert_eq!(page.get_pixel(8, 2).0, WHITE);
}

#[test]
fn slice_fills_transparency_with_background() {
    let dark = [5, 10, 21];
    let img = image::RgbaImage::from_pixel(10, 10, image::Rgba([0, 0, 0, 0]));
    let doc = document(img, 1.0, dark);
    let page = slice(&doc.bitmap, 0, 10, dark);
    assert!(page.pixels().all(|p| p.0 == dark));
}
