/*!
 * Tests for the deterministic stub generator
 */

use seogen::catalog::ProductRecord;
use seogen::generation::markup::{old_description_block, CURRENT_DESCRIPTION_HEADING};
use seogen::generation::stub::ANNOTATION_SUFFIX;
use seogen::generation::StubGenerator;
use seogen::validation::normalize::markup_len;
use seogen::validation::LengthWindow;

use crate::common;

fn generator(min: usize, max: usize, inline_images: bool) -> StubGenerator {
    StubGenerator::new(LengthWindow::new(min, max).unwrap(), inline_images)
}

#[test]
fn test_generate_basicTshirt_shouldFitWindowAndPassValidation() {
    let markup = generator(500, 600, false).generate(&common::basic_tshirt());
    let len = markup_len(&markup);
    assert!((500..=600).contains(&len), "length {}", len);

    let report = common::validator(500, 600, &[]).validate(&markup);
    assert!(report.ok, "{:?}", report.errors);
}

#[test]
fn test_generate_acrossWindows_shouldAlwaysLandInside() {
    let products = [common::basic_tshirt(), common::ceramic_mug(), ProductRecord::new("X")];
    for (min, max) in [(500, 600), (2_000, 2_100), (8_000, 8_000), (25_000, 27_000)] {
        let stub = generator(min, max, false);
        for product in &products {
            let len = markup_len(&stub.generate(product));
            assert!(
                (min..=max).contains(&len),
                "{} chars for '{}' outside [{}, {}]",
                len,
                product.title,
                min,
                max
            );
        }
    }
}

#[test]
fn test_generate_withLargeWindow_shouldPassDefaultRepetitionPolicy() {
    common::init_logging();
    let markup = StubGenerator::default().generate(&common::ceramic_mug());
    let report = common::validator(25_000, 27_000, &["miracle", "guaranteed"]).validate(&markup);
    assert!(report.ok, "{:?}", report.errors);
}

#[test]
fn test_generate_withWindowBeyondOnePass_shouldCycleAnnotatedFiller() {
    // 8000 chars cannot be reached with one pass over the pool
    let markup = generator(8_000, 9_000, false).generate(&common::basic_tshirt());
    assert!(markup.contains(ANNOTATION_SUFFIX));
}

#[test]
fn test_generate_shouldStartWithVerbatimOldDescription() {
    let product = common::ceramic_mug();
    let old = product.old_description.clone().unwrap();
    let markup = generator(3_000, 4_000, false).generate(&product);

    assert!(markup.starts_with(&old_description_block(&old)));
    assert_eq!(markup.matches(&old).count(), 1);
    assert_eq!(markup.matches(CURRENT_DESCRIPTION_HEADING).count(), 1);
}

#[test]
fn test_generate_withBlankOldDescription_shouldOmitBlock() {
    let product = common::basic_tshirt().with_old_description("   ");
    let markup = generator(3_000, 4_000, false).generate(&product);
    assert!(!markup.contains(CURRENT_DESCRIPTION_HEADING));
}

#[test]
fn test_generate_imageModes_shouldFollowInlineFlag() {
    let product = common::ceramic_mug();
    let elements = generator(3_000, 100_000, false).generate(&product);
    let inline = generator(3_000, 100_000, true).generate(&product);

    assert_eq!(elements.matches("<img src=").count(), 2);
    assert!(!inline.contains("<img"));
    assert!(inline.contains("<li>https://cdn.example.com/mug-1.jpg</li>"));
}

#[test]
fn test_generate_shouldEscapeProductFields() {
    let markup = generator(3_000, 100_000, false).generate(&common::ceramic_mug());
    assert!(markup.contains("Potter &amp; Sons"));
    assert!(!markup.contains("Potter & Sons"));
}

#[test]
fn test_generate_shouldTruncateWithEllipsis() {
    let markup = generator(50, 80, false).generate(&common::ceramic_mug());
    assert_eq!(markup_len(&markup), 80);
    assert!(markup.ends_with("..."));
}

#[test]
fn test_generate_withEmptyProduct_shouldStillTerminate() {
    let markup = generator(5_000, 6_000, false).generate(&ProductRecord::default());
    assert!((5_000..=6_000).contains(&markup_len(&markup)));
}
