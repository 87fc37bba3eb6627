//! Image down-scaling, lazy-load placeholders, and widening.

use markup5ever_rcdom::Handle;
use tracing::debug;

use crate::dom;

use super::classify::parse_dimension;
use super::constants;

/// Pick the largest bucket strictly smaller than `width` and recompute the
/// height preserving the aspect ratio exactly (integer rounding).
pub fn scale_to_buckets(width: u32, height: u32, buckets: &[u32]) -> Option<(u32, u32)> {
    let target = buckets.iter().copied().filter(|b| *b < width).max()?;
    let scaled_height =
        ((height as u64 * target as u64 + width as u64 / 2) / width as u64) as u32;
    Some((target, scaled_height))
}

/// Down-scale an image in place: rewrite the thumb URL's width token, the
/// width/height attributes, and the srcset entries.
///
/// Attribute-only mutation; safe during the walk. Images without a thumb
/// width token in their URL, or smaller than the smallest bucket, are left
/// alone.
pub fn scale_down(node: &Handle) {
    let Some(width) = parse_dimension(node, "width") else {
        return;
    };
    let Some(height) = parse_dimension(node, "height") else {
        return;
    };
    if width < constants::MIN_IMAGE_SIZE || height < constants::MIN_IMAGE_SIZE {
        return;
    }
    let Some((target, scaled_height)) =
        scale_to_buckets(width, height, constants::IMAGE_WIDTH_BUCKETS)
    else {
        return;
    };
    let Some(src) = dom::get_attr(node, "src") else {
        return;
    };
    if constants::thumb_url_width(&src).is_none() {
        // Not a sizable thumbnail URL.
        return;
    }

    dom::set_attr(node, "src", &constants::rewrite_thumb_url_width(&src, target));
    dom::set_attr(node, "width", &target.to_string());
    dom::set_attr(node, "height", &scaled_height.to_string());
    rewrite_srcset(node, width, target);
}

/// Rewrite each srcset entry for the new base width; entries whose density
/// multiple cannot be served below the original width are dropped. An empty
/// result removes the attribute entirely.
fn rewrite_srcset(node: &Handle, original_width: u32, target: u32) {
    let Some(srcset) = dom::get_attr(node, "srcset") else {
        return;
    };

    let mut kept = Vec::new();
    for entry in srcset.split(',') {
        let entry = entry.trim();
        let mut parts = entry.split_whitespace();
        let (Some(url), Some(descriptor)) = (parts.next(), parts.next()) else {
            continue;
        };
        let Some(density) = descriptor
            .strip_suffix('x')
            .and_then(|d| d.parse::<f32>().ok())
        else {
            continue;
        };
        let needed = (target as f32 * density).round() as u32;
        if needed >= original_width {
            continue;
        }
        kept.push(format!(
            "{} {descriptor}",
            constants::rewrite_thumb_url_width(url, needed)
        ));
    }

    if kept.is_empty() {
        dom::remove_attr(node, "srcset");
    } else {
        dom::set_attr(node, "srcset", &kept.join(", "));
    }
}

/// Replace an image with a lazy-load placeholder span carrying the image's
/// source and geometry in data attributes.
pub fn replace_with_placeholder(image: &Handle, widen: bool) {
    let placeholder = dom::create_element(
        "span",
        &[("class", "pcs-lazy-load-placeholder pcs-lazy-load-placeholder-pending")],
    );

    for attr in ["src", "srcset", "width", "height", "class", "alt"] {
        if let Some(value) = dom::get_attr(image, attr) {
            let data_name = format!("data-{attr}");
            dom::set_attr(&placeholder, &data_name, &value);
        }
    }
    if let Some(width) = dom::get_attr(image, "width") {
        dom::set_attr(&placeholder, "style", &format!("width: {width}px;"));
    }

    dom::replace_with(image, &placeholder);
    if widen {
        widen_ancestors(&placeholder);
    }
}

/// Force full-width layout on every ancestor between the placeholder and
/// its enclosing section. Best-effort; a placeholder that is not inside a
/// section is skipped.
pub fn widen_ancestors(node: &Handle) {
    let mut current = dom::parent_of(node);
    let mut widened = false;
    while let Some(ancestor) = current {
        if dom::is_element_named(&ancestor, "section")
            || dom::is_element_named(&ancestor, "body")
        {
            break;
        }
        dom::add_class(&ancestor, "pcs-widen-image-ancestor");
        widened = true;
        current = dom::parent_of(&ancestor);
    }
    if !widened {
        debug!("widen skipped: no ancestors between image and section");
    }
}
