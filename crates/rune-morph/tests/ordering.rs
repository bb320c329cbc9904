mod common;

use anyhow::{Context, Result};
use common::Fixture;
use rune_morph::{
    DefaultAnimation, Direction, PluginRegistry, Presentation, Transition, TransitionOptions,
    ViewOrderingStrategy,
};

/// Child order of the transition container once animators are running.
fn container_order(
    presentation: Presentation,
    options: TransitionOptions,
) -> Result<(Fixture, Vec<rune_morph::scene::ElementId>)> {
    let mut fx = Fixture::new();
    let mut transition =
        Transition::with_registry(fx.request(presentation, options), &PluginRegistry::new());
    transition.start(&mut fx.host);
    let container = transition.context().context("context")?.container();
    transition.run_scheduled(&mut fx.host);
    let order = fx.host.graph.children(container).to_vec();
    Ok((fx, order))
}

fn fade() -> TransitionOptions {
    TransitionOptions::default().with_default_animation(DefaultAnimation::Fade)
}

#[test]
fn dismissing_inserts_destination_below() -> Result<()> {
    let (fx, order) = container_order(Presentation::dismiss(), fade())?;
    assert_eq!(order, vec![fx.to_root, fx.from_root]);
    Ok(())
}

#[test]
fn presenting_inserts_destination_above() -> Result<()> {
    let (fx, order) = container_order(Presentation::present(), fade())?;
    assert_eq!(order, vec![fx.from_root, fx.to_root]);
    Ok(())
}

#[test]
fn tab_container_dismissal_keeps_destination_above() -> Result<()> {
    let (fx, order) = container_order(Presentation::dismiss().in_tab_container(), fade())?;
    assert_eq!(order, vec![fx.from_root, fx.to_root]);
    Ok(())
}

#[test]
fn explicit_strategies_override_presentation() -> Result<()> {
    let (fx, order) = container_order(
        Presentation::present(),
        fade().with_ordering(ViewOrderingStrategy::SourceOnTop),
    )?;
    assert_eq!(order, vec![fx.to_root, fx.from_root]);

    let (fx, order) = container_order(
        Presentation::dismiss(),
        fade().with_ordering(ViewOrderingStrategy::DestinationOnTop),
    )?;
    assert_eq!(order, vec![fx.from_root, fx.to_root]);
    Ok(())
}

#[test]
fn default_animation_adjusts_auto_ordering() -> Result<()> {
    let pull = TransitionOptions::default()
        .with_default_animation(DefaultAnimation::Pull(Direction::Right));
    let (fx, order) = container_order(Presentation::present(), pull.clone())?;
    assert_eq!(order, vec![fx.to_root, fx.from_root]);

    let (fx, order) = container_order(
        Presentation::present(),
        pull.with_ordering(ViewOrderingStrategy::DestinationOnTop),
    )?;
    assert_eq!(order, vec![fx.from_root, fx.to_root]);
    Ok(())
}

#[test]
fn navigation_push_slides_destination_in() -> Result<()> {
    let mut fx = Fixture::new();
    let mut transition = Transition::with_registry(
        fx.request(Presentation::present().in_navigation(), TransitionOptions::default()),
        &PluginRegistry::new(),
    );
    transition.start(&mut fx.host);
    transition.run_scheduled(&mut fx.host);

    let to = fx.host.graph.get(fx.to_root).context("to root")?.transform;
    let from = fx.host.graph.get(fx.from_root).context("from root")?.transform;
    assert_eq!(to.translate_x, 320.0);
    assert_eq!(from.translate_x, 0.0);

    transition.finish(&mut fx.host);
    let to = fx.host.graph.get(fx.to_root).context("to root")?.transform;
    assert!(to.is_identity());
    Ok(())
}
