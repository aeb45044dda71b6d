use crate::model::*;
use crate::tool::{claimable_actions, MeldOption};
use crate::util::misc::*;

use crate::{debug, error};

// 手牌と捨て牌から可能な鳴きを列挙
#[derive(Debug)]
pub struct ActionsApp {
    args: Vec<String>,
    detail: bool,
    json: bool,
}

impl ActionsApp {
    pub fn new(args: Vec<String>) -> Self {
        Self {
            args,
            detail: false,
            json: false,
        }
    }

    pub fn run(&mut self) {
        let mut params = vec![];
        for s in &self.args {
            match s.as_str() {
                "-d" => self.detail = true,
                "-j" => self.json = true,
                _ => {
                    if s.starts_with('-') {
                        error!("unknown option: {}", s);
                        return;
                    }
                    params.push(s.clone());
                }
            }
        }

        if params.len() != 3 {
            print_usage();
            return;
        }

        match self.list_actions(&params[0], &params[1], &params[2]) {
            Ok(acts) => self.print_actions(&acts),
            Err(e) => error!("{}", e),
        }
    }

    fn list_actions(&self, exp_hand: &str, exp_discard: &str, exp_offset: &str) -> Res<Vec<MeldOption>> {
        let mut hand = Hand::new();
        hand.deal_initial(&tiles_from_string(exp_hand)?)?;
        let discard = Tile::from_symbol(exp_discard)?;
        let offset = exp_offset.parse::<SeatOffset>()?;
        if self.detail {
            debug!("{}", hand);
        }

        let acts = claimable_actions(&hand, discard, offset);
        if offset == 0 || offset >= SEAT {
            println!("no claim from seat offset {}", offset);
        }
        Ok(acts)
    }

    fn print_actions(&self, acts: &[MeldOption]) {
        if self.json {
            match serde_json::to_string(acts) {
                Ok(s) => println!("{}", s),
                Err(e) => error!("{}", e),
            }
            return;
        }

        if acts.is_empty() {
            println!("no actions");
        }
        for a in acts {
            println!("{}", a);
        }
    }
}

fn print_usage() {
    error!(
        r"invalid input
Usage
    $ cargo run A HAND DISCARD OFFSET [-d] [-j]
    HAND:    13 tiles (ex. m123789p46s1239z1)
    DISCARD: discarded tile (ex. p5)
    OFFSET:  seat of the discarder seen from the claimant (1: left, 2: across, 3: right)
Options
    -d: print debug info
    -j: print result as json
"
    );
}

#[test]
fn test_list_actions() {
    let app = ActionsApp::new(vec![]);
    let acts = app.list_actions("m123789p46s1239z1", "p5", "1").unwrap();
    assert_eq!(acts.len(), 1);
    let acts = app.list_actions("m123789p46s1239z1", "p5", "2").unwrap();
    assert!(acts.is_empty());
    assert!(app.list_actions("m123789p46s1239", "p5", "1").is_err());
    assert!(app.list_actions("m123789p46s1239z1", "p0", "1").is_err());
    assert!(app.list_actions("m123789p46s1239z1", "p5", "x").is_err());
}
