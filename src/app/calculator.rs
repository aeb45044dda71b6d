use std::fmt::Write;
use std::fs::File;
use std::io::{self, BufRead};

use crate::hand::{evaluate, win_shape, ScoringResult};
use crate::model::*;
use crate::util::misc::*;

use crate::{error, info};

#[derive(Debug)]
pub struct CalculatorApp {
    args: Vec<String>,
    detail: bool,
    json: bool,
}

impl CalculatorApp {
    pub fn new(args: Vec<String>) -> Self {
        Self {
            args,
            detail: false,
            json: false,
        }
    }

    pub fn run(&mut self) {
        let mut file_path = "".to_string();
        let mut exp = "".to_string();
        let mut it = self.args.iter();
        while let Some(s) = it.next() {
            match s.as_str() {
                "-d" => self.detail = true,
                "-j" => self.json = true,
                "-f" => file_path = next_value(&mut it, s),
                _ => {
                    if s.starts_with('-') {
                        error!("unknown option: {}", s);
                        return;
                    }
                    if !exp.is_empty() {
                        error!("multiple expression is not allowed");
                        return;
                    }
                    exp = s.clone();
                }
            }
        }

        if (file_path.is_empty() && exp.is_empty()) || (!file_path.is_empty() && !exp.is_empty()) {
            print_usage();
            return;
        }

        if !exp.is_empty() {
            if let Err(e) = self.process_expression(&exp) {
                error!("{}", e);
            }
            return;
        }

        if let Err(e) = self.run_from_file(&file_path) {
            error!("{}", e);
        }
    }

    fn run_from_file(&self, file_path: &str) -> Res {
        let file = File::open(file_path)?;
        let lines = io::BufReader::new(file).lines();
        let (mut n_ok, mut n_error, mut n_skip) = (0, 0, 0);
        for exp in lines.map_while(Result::ok) {
            let e = exp.replace(' ', "");
            if e.is_empty() || e.starts_with('#') {
                // 空行とコメント行はスキップ
                println!("> {}", exp);
                continue;
            }
            match self.process_expression(&exp) {
                Ok(Verify::Ok) => n_ok += 1,
                Ok(Verify::Error) => n_error += 1,
                Ok(Verify::Skip) => n_skip += 1,
                Err(e) => {
                    error!("{}", e);
                    n_error += 1;
                }
            }
            println!();
        }
        info!("verify: ok={}, error={}, skip={}", n_ok, n_error, n_skip);
        Ok(())
    }

    fn process_expression(&self, exp: &str) -> Res<Verify> {
        let mut calculator = Calculator::new(self.detail, self.json);
        calculator.parse(exp)?;
        Ok(calculator.run())
    }
}

#[derive(Debug, PartialEq)]
enum Verify {
    Ok,
    Error,
    Skip,
}

#[derive(Debug)]
struct Calculator {
    detail: bool,
    json: bool,
    // evaluate params
    hand: Vec<Tile>, // 手牌(鳴き以外) 最後の牌が和了牌
    melds: Vec<Meld>,
    won_by_claim: bool,
    ctx: TurnContext,
    // fan verify
    verify: bool,
    fan: usize,
}

impl Calculator {
    fn new(detail: bool, json: bool) -> Self {
        Self {
            detail,
            json,
            hand: vec![],
            melds: vec![],
            won_by_claim: false,
            ctx: TurnContext::with_winds(Wind::East, Wind::East),
            verify: false,
            fan: 0,
        }
    }

    // HAND[+][,MELD...][/WINDS][/FLAGS][/FAN]
    fn parse(&mut self, input: &str) -> Res {
        println!("> {}", input);

        let input = input.replace(' ', "");
        let input = input.split('#').next().unwrap_or(""); // コメント削除
        let exps: Vec<&str> = input.split('/').collect();
        let len = exps.len();
        if len > 0 {
            self.parse_hand_meld(exps[0])?;
        }
        if len > 1 {
            self.parse_winds(exps[1])?;
        }
        if len > 2 {
            self.parse_flags(exps[2])?;
        }
        if len > 3 {
            self.parse_fan_verify(exps[3])?;
        }
        if len > 4 {
            Err(format!("too many fields: {}", input))?;
        }

        self.ctx = if self.won_by_claim {
            self.ctx.claimed()
        } else {
            self.ctx.self_drawn()
        };

        if self.detail {
            println!("{:?}", self);
        }

        Ok(())
    }

    fn snapshot(&self) -> HandSnapshot {
        let mut concealed = self.hand.clone();
        let winning_tile = concealed.pop();
        HandSnapshot::new(concealed, winning_tile, self.melds.clone())
    }

    fn run(&self) -> Verify {
        let snapshot = self.snapshot();
        let res = match evaluate(&snapshot, &self.ctx) {
            Ok(res) => res,
            Err(e) => {
                error!("{}", e);
                return if self.verify { Verify::Error } else { Verify::Skip };
            }
        };

        if win_shape(&snapshot).is_none() {
            println!("not win hand");
        }
        self.print_result(&res);

        let verify = if self.verify {
            if res.total_fan == self.fan {
                Verify::Ok
            } else {
                Verify::Error
            }
        } else {
            Verify::Skip
        };
        println!("verify: {:?}", verify);
        verify
    }

    fn print_result(&self, res: &ScoringResult) {
        if self.detail {
            println!("{:?}", res);
        }
        if self.json {
            match serde_json::to_string(res) {
                Ok(s) => println!("{}", s),
                Err(e) => error!("{}", e),
            }
            return;
        }

        let mut yakus = "".to_string();
        for m in &res.yakus {
            let _ = write!(yakus, "{}({}), ", m.yaku.name(), m.fan);
        }
        if res.is_no_yaku() {
            yakus = res.rule_names().join(", ");
        }
        println!("yakus: {}", yakus);
        println!("fan: {}, yakuman: {}", res.total_fan, res.yakuman);
    }

    fn parse_hand_meld(&mut self, input: &str) -> Res {
        let mut exp_hand = "".to_string();
        let mut exp_melds = vec![];
        for (i, exp) in input.split(',').enumerate() {
            if i == 0 {
                if exp.ends_with('+') {
                    self.won_by_claim = true;
                }
                exp_hand = exp.replace('+', "");
            } else {
                exp_melds.push(exp.to_string());
            }
        }

        self.hand = tiles_from_string(&exp_hand)?;
        if self.hand.is_empty() {
            Err("empty hand")?;
        }
        for exp_meld in &exp_melds {
            self.melds.push(meld_from_string(exp_meld)?);
        }

        Ok(())
    }

    // 場風 + 自風 (例: ES = 東場の南家) 自風が東の場合は親
    fn parse_winds(&mut self, input: &str) -> Res {
        if input.is_empty() {
            return Ok(());
        }
        let chars: Vec<char> = input.chars().collect();
        if chars.len() != 2 {
            Err(format!("winds len is not 2: {}", input))?;
        }
        let prevalent_wind = Wind::from_char(chars[0])?;
        let seat_wind = Wind::from_char(chars[1])?;
        self.ctx = TurnContext {
            is_riichi: self.ctx.is_riichi,
            is_first_uninterrupted_turn: self.ctx.is_first_uninterrupted_turn,
            ..TurnContext::with_winds(prevalent_wind, seat_wind)
        };
        Ok(())
    }

    fn parse_flags(&mut self, input: &str) -> Res {
        for flag in input.split(',') {
            match flag {
                "riichi" => self.ctx.is_riichi = true,
                "first" => self.ctx.is_first_uninterrupted_turn = true,
                "" => {}
                _ => Err(format!("invalid flag: {}", flag))?,
            }
        }
        Ok(())
    }

    fn parse_fan_verify(&mut self, input: &str) -> Res {
        self.fan = input.parse::<usize>()?;
        self.verify = true;
        Ok(())
    }
}

fn print_usage() {
    error!(
        r"invalid input
Usage
    $ cargo run C EXPRESSION [-d] [-j]
    $ cargo run C -f FILE [-d] [-j]
Expression
    HAND[+][,MELD...][/WINDS][/FLAGS][/FAN]
    HAND:  m123p456s789z11122 (the last tile is the winning tile, '+' suffix: won by claim)
    MELD:  p55+5 (pung from across), m4+56 (chow), z7777 (concealed kong)
    WINDS: prevalent + seat wind (ex. ES)
    FLAGS: riichi,first
    FAN:   expected total fan
Options
    -d: print debug info
    -j: print result as json
    -f: read expresisons from file instead of a commandline expression
"
    );
}

#[test]
fn test_calculator() {
    let file = File::open("tests/win_hands.txt").unwrap();
    let lines = io::BufReader::new(file).lines();
    for exp in lines.map_while(Result::ok) {
        let e = exp.replace(' ', "");
        if e.is_empty() || e.starts_with('#') {
            // 空行とコメント行はスキップ
            println!("> {}", exp);
        } else {
            let mut calculator = Calculator::new(false, false);
            calculator.parse(&e).unwrap();
            assert_eq!(Verify::Ok, calculator.run(), "{}", exp);
        }
    }
}

#[test]
fn test_calculator_parse() {
    let mut calculator = Calculator::new(false, false);
    calculator
        .parse("m234p567s23499+,z111+1/ES/riichi/1")
        .unwrap();
    assert!(calculator.won_by_claim);
    assert_eq!(calculator.hand.len(), 11);
    assert_eq!(calculator.melds.len(), 1);
    assert!(!calculator.ctx.is_dealer);
    assert!(calculator.ctx.won_by_claim);
    assert!(calculator.ctx.is_riichi);
    assert_eq!(calculator.ctx.seat_wind, Wind::South);

    let mut calculator = Calculator::new(false, false);
    assert!(calculator.parse("m234/EX").is_err());
    let mut calculator = Calculator::new(false, false);
    assert!(calculator.parse("m234//tenhou").is_err());
    let mut calculator = Calculator::new(false, false);
    assert!(calculator.parse("m234,p555").is_err());
}
