// End-to-end checks of the draft engine against the built-in sample pool.

use pickboard_football::draft::player::{Player, PlayerStatus, Position};
use pickboard_football::draft::pool::Pool;
use pickboard_football::draft::roster::{FlexEligibility, RosterShape};
use pickboard_football::sample::sample_pool;
use pickboard_football::valuation::byes::find_bye_conflicts;
use pickboard_football::valuation::needs::compute_needs;
use pickboard_football::valuation::recommend::{balanced_pick, greedy_pick};
use pickboard_football::valuation::scarcity::{score_available, ScarcityBoard};
use pickboard_football::valuation::slots::compute_filled_slots;
use pickboard_football::valuation::{analyze, DraftReport};

// ===========================================================================
// Helpers
// ===========================================================================

/// QB1 RB2 WR2 TE1 FLEX1 DST1 K1.
fn small_roster() -> RosterShape {
    RosterShape {
        qb: 1,
        rb: 2,
        wr: 2,
        te: 1,
        dst: 1,
        k: 1,
        flex_slots: 1,
        bench_slots: 0,
    }
}

fn id_of(pool: &Pool, name: &str) -> String {
    pool.players()
        .iter()
        .find(|p| p.name == name)
        .map(|p| p.id.clone())
        .unwrap_or_else(|| panic!("{name} is not in the sample pool"))
}

fn claim(pool: &mut Pool, name: &str) {
    let id = id_of(pool, name);
    pool.claim(&id).unwrap();
}

fn report(pool: &Pool) -> DraftReport {
    analyze(pool.players(), &small_roster(), &FlexEligibility::default(), 30.0)
}

fn all_scores(pool: &Pool, weight: f64) -> Vec<u64> {
    let roster = small_roster();
    let flex = FlexEligibility::default();
    let filled = compute_filled_slots(pool.players(), &roster, &flex);
    let needs = compute_needs(&filled, &roster);
    pool.players()
        .iter()
        .filter(|p| p.is_available())
        .map(|p| score_available(p, pool.players(), &flex, &needs, weight).to_bits())
        .collect()
}

// ===========================================================================
// Sample-pool scenarios
// ===========================================================================

#[test]
fn fresh_pool_recommends_mccaffrey_and_needs_every_starter() {
    let pool = Pool::new(sample_pool());
    let report = report(&pool);

    let greedy = report.recommendations.greedy.expect("greedy pick");
    assert_eq!(greedy.player.name, "Christian McCaffrey");
    assert_eq!(greedy.score, 100.0);

    let needs = &report.needs;
    assert_eq!(needs.get(&Position::Quarterback), 1);
    assert_eq!(needs.get(&Position::RunningBack), 2);
    assert_eq!(needs.get(&Position::WideReceiver), 2);
    assert_eq!(needs.get(&Position::TightEnd), 1);
    assert_eq!(needs.get(&Position::Defense), 1);
    assert_eq!(needs.get(&Position::Kicker), 1);
    assert_eq!(needs.flex, 1);
    assert_eq!(needs.total(), 9);

    assert_eq!(report.available_count, 20);
    assert_eq!(report.claimed_count, 0);
    assert!(report.bye_conflicts.is_empty());
}

#[test]
fn two_running_backs_fill_fixed_slots_then_third_fills_flex() {
    let mut pool = Pool::new(sample_pool());
    claim(&mut pool, "Christian McCaffrey");
    claim(&mut pool, "Breece Hall");

    let r = report(&pool);
    assert_eq!(r.filled.get(&Position::RunningBack), 2);
    assert_eq!(r.filled.flex, 0);
    assert_eq!(r.needs.get(&Position::RunningBack), 0);
    assert_eq!(r.needs.flex, 1);

    claim(&mut pool, "Bijan Robinson");
    let r = report(&pool);
    assert_eq!(r.filled.get(&Position::RunningBack), 2);
    assert_eq!(r.filled.flex, 1);
    assert_eq!(r.needs.flex, 0);
}

#[test]
fn different_bye_weeks_do_not_conflict() {
    let mut pool = Pool::new(sample_pool());
    claim(&mut pool, "Christian McCaffrey");
    claim(&mut pool, "Jahmyr Gibbs");
    assert!(find_bye_conflicts(pool.players()).is_empty());
}

#[test]
fn shared_bye_week_conflicts_and_lone_week_does_not() {
    let mut pool = Pool::new(sample_pool());
    let rb9 = Player::new("", "Elijah Mitchell", Position::RunningBack, "SF", 40.0).with_bye(9);
    let rb9_id = pool.add_custom_player(rb9).unwrap();

    claim(&mut pool, "Christian McCaffrey");
    claim(&mut pool, "Bijan Robinson");
    pool.claim(&rb9_id).unwrap();

    let conflicts = find_bye_conflicts(pool.players());
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].position, Position::RunningBack);
    assert_eq!(conflicts[0].bye_week, 9);
    assert_eq!(conflicts[0].count, 2);
}

// ===========================================================================
// Properties
// ===========================================================================

#[test]
fn total_need_never_increases_while_claiming() {
    let mut pool = Pool::new(sample_pool());
    let roster = small_roster();
    let flex = FlexEligibility::default();
    let ids: Vec<String> = pool.players().iter().map(|p| p.id.clone()).collect();

    let mut last = compute_needs(&compute_filled_slots(pool.players(), &roster, &flex), &roster);
    for id in ids {
        pool.claim(&id).unwrap();
        let needs = compute_needs(&compute_filled_slots(pool.players(), &roster, &flex), &roster);
        assert!(needs.total() <= last.total(), "claiming {id} raised total need");
        last = needs;
    }
    assert_eq!(last.total(), 0);
}

#[test]
fn claim_then_unclaim_restores_everything_bit_for_bit() {
    let mut pool = Pool::new(sample_pool());
    claim(&mut pool, "Josh Allen");
    let before = report(&pool);
    let scores_before = all_scores(&pool, 30.0);

    let id = id_of(&pool, "CeeDee Lamb");
    pool.claim(&id).unwrap();
    assert_ne!(report(&pool).filled, before.filled);
    pool.unclaim(&id).unwrap();

    let after = report(&pool);
    assert_eq!(after.filled, before.filled);
    assert_eq!(after.needs, before.needs);
    assert_eq!(all_scores(&pool, 30.0), scores_before);
}

#[test]
fn greedy_pick_is_the_first_maximum() {
    let mut pool = Pool::new(sample_pool());
    claim(&mut pool, "Christian McCaffrey");
    // Josh Allen (98) is now the top remaining value.
    assert_eq!(greedy_pick(pool.players()).map(|p| p.name.as_str()), Some("Josh Allen"));

    // Patrick Mahomes and CeeDee Lamb share 94; Mahomes comes first in the pool.
    for name in ["Josh Allen", "Jalen Hurts"] {
        let id = id_of(&pool, name);
        pool.mark_drafted(&id).unwrap();
    }
    assert_eq!(
        greedy_pick(pool.players()).map(|p| p.name.as_str()),
        Some("Patrick Mahomes")
    );
}

#[test]
fn scores_rise_with_scarcity_weight() {
    let pool = Pool::new(sample_pool());
    let roster = small_roster();
    let flex = FlexEligibility::default();
    let needs = compute_needs(&compute_filled_slots(pool.players(), &roster, &flex), &roster);

    for player in pool.players() {
        let mut last = f64::NEG_INFINITY;
        for step in 0..=30 {
            let weight = step as f64 * 2.0;
            let score = score_available(player, pool.players(), &flex, &needs, weight);
            assert!(score >= last, "{} dropped at weight {weight}", player.name);
            last = score;
        }
    }
}

#[test]
fn batch_scores_match_single_scores() {
    let mut pool = Pool::new(sample_pool());
    claim(&mut pool, "Travis Kelce");
    claim(&mut pool, "Justin Jefferson");
    let roster = small_roster();
    let flex = FlexEligibility::default();
    let needs = compute_needs(&compute_filled_slots(pool.players(), &roster, &flex), &roster);
    let board = ScarcityBoard::new(pool.players(), &flex, &needs, 30.0);

    for player in pool.players().iter().filter(|p| p.is_available()) {
        let single = score_available(player, pool.players(), &flex, &needs, 30.0);
        assert_eq!(board.score(player).to_bits(), single.to_bits());
    }
}

#[test]
fn balanced_pick_never_repeats_a_claimed_player() {
    let mut pool = Pool::new(sample_pool());
    let roster = small_roster();
    let flex = FlexEligibility::default();

    let first = balanced_pick(pool.players(), &roster, &flex, 30.0)
        .map(|p| p.id.clone())
        .expect("a pick");
    pool.claim(&first).unwrap();

    let second = balanced_pick(pool.players(), &roster, &flex, 30.0).expect("a pick");
    assert_ne!(second.id, first);
    assert!(second.is_available());
}

#[test]
fn nothing_available_means_no_recommendations() {
    let mut pool = Pool::new(sample_pool());
    let ids: Vec<String> = pool.players().iter().map(|p| p.id.clone()).collect();
    for id in &ids {
        pool.set_status(id, PlayerStatus::DraftedByOther).unwrap();
    }
    let r = report(&pool);
    assert!(r.recommendations.greedy.is_none());
    assert!(r.recommendations.balanced.is_none());
    assert_eq!(r.available_count, 0);
}
