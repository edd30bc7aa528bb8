//! Generate → parse round trips over representative layouts.

mod common;

use common::{assert_round_trip, round_trip};
use ticket_script_core::{Alignment, ElementKind, FontSize, TicketElement};

fn recycling_ticket() -> Vec<TicketElement> {
    vec![
        TicketElement::image("logo.bin").with_align(Alignment::Center),
        TicketElement::spacing(-170).with_align(Alignment::Center),
        TicketElement::text("北斗鎮公所")
            .with_align(Alignment::Center)
            .with_bold(true)
            .with_size(FontSize::Large),
        TicketElement::text("資源回收兌換券").with_align(Alignment::Center),
        TicketElement::spacing(30),
        TicketElement::text("品項: {typename}"),
        TicketElement::text("數量: {num}").with_bold(true),
        TicketElement::text("日期: {date}").with_align(Alignment::Right),
        TicketElement::spacing(24),
    ]
}

#[test]
fn full_ticket_round_trips() {
    assert_round_trip(&recycling_ticket());
}

#[test]
fn every_text_style_combination_round_trips() {
    let mut layout = Vec::new();
    for align in [Alignment::Left, Alignment::Center, Alignment::Right] {
        for bold in [false, true] {
            for size in [FontSize::Normal, FontSize::Large] {
                layout.push(
                    TicketElement::text(format!("{align:?} {bold} {size:?}"))
                        .with_align(align)
                        .with_bold(bold)
                        .with_size(size),
                );
            }
        }
    }
    assert_round_trip(&layout);
    layout.reverse();
    assert_round_trip(&layout);
}

#[test]
fn multiline_text_round_trips() {
    let back = round_trip(&[TicketElement::text("a\nb")]);
    assert_eq!(back.len(), 1);
    assert_eq!(back[0].text_content(), Some("a\nb"));
}

#[test]
fn spacing_carries_the_state_it_was_emitted_in() {
    // Spacing elements take their style from the element before them, so a
    // layout only round-trips when the spacing matches that style.
    let layout = vec![
        TicketElement::text("x").with_bold(true).with_size(FontSize::Large),
        TicketElement::spacing(10).with_bold(true).with_size(FontSize::Large),
    ];
    assert_round_trip(&layout);
}

#[test]
fn image_name_survives() {
    let back = round_trip(&[TicketElement::image("stamp.bmp").with_align(Alignment::Right)]);
    assert_eq!(back.len(), 1);
    assert_eq!(back[0].image_file_name(), Some("stamp.bmp"));
    assert_eq!(back[0].align, Alignment::Right);
    assert!(matches!(
        &back[0].kind,
        ElementKind::Image { content, .. } if content.is_empty()
    ));
}

#[test]
fn zero_spacing_disappears() {
    let back = round_trip(&[TicketElement::text("a"), TicketElement::spacing(0)]);
    assert_eq!(back.len(), 1);
}

#[test]
fn ids_are_fresh() {
    let layout = recycling_ticket();
    let back = round_trip(&layout);
    for (a, b) in layout.iter().zip(&back) {
        assert_ne!(a.id, b.id);
    }
}
