use rand::prelude::*;

use mahjong_hand::model::*;
use mahjong_hand::tool::{claimable_actions, self_kong_options};

// シード値に従ってシャッフルした136枚の牌山
fn create_wall(seed: u64) -> Vec<Tile> {
    let mut wall = Vec::new();
    for t in Tile::all() {
        for _ in 0..TILE {
            wall.push(t);
        }
    }

    let mut rng: rand::rngs::StdRng = rand::SeedableRng::seed_from_u64(seed);
    wall.shuffle(&mut rng);
    wall
}

fn dealt(wall: &mut Vec<Tile>) -> Hand {
    let tiles: Vec<Tile> = wall.drain(..HAND).collect();
    let mut h = Hand::new();
    h.deal_initial(&tiles).unwrap();
    h
}

#[test]
fn test_wall() {
    let wall = create_wall(0);
    assert_eq!(wall.len(), 136);
    let tt = tiles_to_tile_table(&wall);
    assert!(Tile::all().all(|t| count_tile(&tt, t) == TILE));
}

#[test]
fn test_random_deal() {
    for seed in 0..100 {
        let mut wall = create_wall(seed);
        let h = dealt(&mut wall);
        assert_eq!(h.concealed().len(), HAND);
        assert_eq!(h.drawn(), None);
        assert_eq!(h.state(), HandState::AwaitingDraw);
        assert!(h.concealed().windows(2).all(|w| w[0] <= w[1]));
    }
}

#[test]
fn test_random_draw_discard() {
    for seed in 0..100 {
        let mut wall = create_wall(seed);
        let mut h = dealt(&mut wall);
        let mut rng: rand::rngs::StdRng = rand::SeedableRng::seed_from_u64(seed);

        for _ in 0..18 {
            let t = wall.pop().unwrap();
            h.draw(t).unwrap();
            assert_eq!(h.tile_count(), HAND + 1);

            // ツモ切りと手出しをランダムに選択
            if rng.gen_bool(0.5) {
                h.discard(t, true).unwrap();
            } else {
                let &d = h.concealed().choose(&mut rng).unwrap();
                h.discard(d, false).unwrap();
            }
            assert_eq!(h.concealed().len(), HAND);
            assert_eq!(h.drawn(), None);
            assert_eq!(h.state(), HandState::AwaitingDraw);
        }
        assert_eq!(h.discards().len(), 18);
    }
}

#[test]
fn test_random_claims() {
    // 鳴きの適用で手牌は2枚(ポン,チー)または3枚(カン)減り,実効枚数は保存される
    let mut n_applied = 0;
    for seed in 0..200 {
        let mut wall = create_wall(seed);
        let h = dealt(&mut wall);
        for &d in wall.iter().take(30) {
            for offset in [LEFT, ACROSS, RIGHT] {
                for opt in claimable_actions(&h, d, offset) {
                    let mut h2 = h.clone();
                    let before = h2.concealed().len();
                    h2.apply_meld(opt.meld.clone()).unwrap();
                    n_applied += 1;

                    let consumed = opt.meld.kind().tile_count() - 1;
                    assert_eq!(h2.concealed().len(), before - consumed);
                    assert_eq!(h2.melds().len(), 1);
                    assert!(!h2.is_concealed());
                    match opt.meld.kind() {
                        // 嶺上牌のツモ待ち
                        MeldKind::Kong => {
                            assert_eq!(h2.tile_count(), HAND);
                            assert_eq!(h2.state(), HandState::AwaitingDraw);
                        }
                        _ => {
                            assert_eq!(h2.tile_count(), HAND + 1);
                            assert_eq!(h2.state(), HandState::MeldDeclared);
                        }
                    }
                }
            }
            assert!(claimable_actions(&h, d, 0).is_empty());
        }
    }
    assert!(n_applied > 0);
}

#[test]
fn test_random_self_kong() {
    for seed in 0..200 {
        let mut wall = create_wall(seed);
        let mut h = dealt(&mut wall);
        h.draw(wall.pop().unwrap()).unwrap();
        for opt in self_kong_options(&h) {
            let mut h2 = h.clone();
            h2.apply_meld(opt.meld).unwrap();
            assert_eq!(h2.concealed().len(), HAND + 1 - TILE);
            assert_eq!(h2.tile_count(), HAND);
            assert!(h2.is_concealed());
            assert_eq!(h2.state(), HandState::AwaitingDraw);
        }
    }
}
