use std::fmt;

use crate::error;
use crate::model::*;

pub type Res<T = ()> = Result<T, Box<dyn std::error::Error>>;

// コマンドライン引数のオプションの値を取得 値がない場合や変換に失敗した場合は終了
pub fn next_value<T>(it: &mut std::slice::Iter<'_, std::string::String>, opt: &str) -> T
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    let n = it
        .next()
        .unwrap_or_else(|| error_exit(format!("{}: value missing", opt)));
    n.parse()
        .unwrap_or_else(|e| error_exit(format!("{}: {} '{}'", opt, e, n)))
}

pub fn error_exit<T: fmt::Display, U>(t: T) -> U {
    error!("{}", t);
    std::process::exit(1);
}

pub fn vec_count<T: PartialEq>(v: &[T], e: &T) -> usize {
    v.iter().filter(|&n| n == e).count()
}

pub fn vec_to_string<T: fmt::Display>(v: &[T]) -> String {
    let vs: Vec<String> = v.iter().map(|x| format!("{}", x)).collect();
    "[".to_string() + &vs.join(", ") + "]"
}

// 各リストから1つずつ要素を選んだすべての組み合わせ
// 空のリストを含む場合は組み合わせなし
pub fn cartesian_product<T>(vv: &[Vec<T>]) -> Vec<Vec<&T>> {
    if vv.is_empty() || vv.iter().any(|l| l.is_empty()) {
        return vec![];
    }

    let lens: Vec<usize> = vv.iter().map(|l| l.len()).collect();
    let mut idxs = vec![0; vv.len()];
    let mut i = idxs.len() - 1;
    let mut res = vec![];
    loop {
        let mut v = vec![];
        for (i1, &i2) in idxs.iter().enumerate() {
            v.push(&vv[i1][i2]);
        }
        res.push(v);

        // increment idxs
        loop {
            if idxs[i] < lens[i] - 1 {
                idxs[i] += 1;
                i = idxs.len() - 1;
                break;
            } else {
                idxs[i] = 0;
                if i == 0 {
                    return res;
                }
            }
            i -= 1;
        }
    }
}

// "m4+56", "p55+5", "z7777" 形式の文字列を鳴きに変換
// '+'の直前の牌が他家から鳴いた牌で,その位置(1..3)が捨てたプレイヤーの座席(1: 上家, 2: 対面, 3: 下家)
// '+'のない槓子は暗槓
pub fn meld_from_string(exp: &str) -> Res<Meld> {
    let mut ti = None;
    let mut tiles = vec![];
    let mut claim = None;
    for ch in exp.chars() {
        match ch {
            'm' | 'p' | 's' | 'z' => ti = TYPE_SYMBOLS.iter().position(|&c| c == ch),
            '+' => {
                let &t = tiles.last().ok_or("invalid '+' suffix")?;
                if claim.is_some() {
                    Err(format!("multiple claimed tiles: '{}'", exp))?;
                }
                claim = Some(Claim {
                    tile: t,
                    from: tiles.len(),
                });
            }
            '0'..='9' => {
                let ti = ti.ok_or("tile number before tile type")?;
                tiles.push(Tile::new(ti, ch as usize - '0' as usize)?);
            }
            _ => Err(format!("invalid char: '{}'", ch))?,
        }
    }
    if tiles.is_empty() {
        Err(format!("invalid meld: '{}'", exp))?;
    }

    let mut nis: Vec<Tnum> = tiles.iter().map(|t| t.number()).collect();
    nis.sort();
    let diffs: Vec<Tnum> = nis.windows(2).map(|w| w[1] - w[0]).collect();

    let kind = if diffs.len() == 2 && vec_count(&diffs, &1) == 2 {
        MeldKind::Chow
    } else if diffs.len() == 2 && vec_count(&diffs, &0) == 2 {
        MeldKind::Pung
    } else if diffs.len() == 3 && vec_count(&diffs, &0) == 3 {
        MeldKind::Kong
    } else {
        Err(format!("invalid meld: '{}'", exp))?
    };

    Ok(Meld::new(kind, tiles, claim)?)
}

#[test]
fn test_cartesian_product() {
    let vv = vec![vec![1, 2], vec![3], vec![4, 5]];
    let res = cartesian_product(&vv);
    assert_eq!(res.len(), 4);
    assert_eq!(res[0], vec![&1, &3, &4]);
    assert_eq!(res[3], vec![&2, &3, &5]);
    assert!(cartesian_product(&[vec![1], vec![]]).is_empty());
}

#[test]
fn test_meld_from_string() {
    let p5 = Tile::from_symbol("p5").unwrap();
    let m = meld_from_string("p55+5").unwrap();
    assert_eq!(m.kind(), MeldKind::Pung);
    assert_eq!(m.claim(), Some(Claim { tile: p5, from: ACROSS }));

    let m = meld_from_string("m4+56").unwrap();
    assert_eq!(m.kind(), MeldKind::Chow);
    assert_eq!(m.claim().map(|c| c.from), Some(LEFT));

    let m = meld_from_string("z7777").unwrap();
    assert_eq!(m.kind(), MeldKind::Kong);
    assert!(m.is_concealed());

    let m = meld_from_string("s111+1").unwrap();
    assert_eq!(m.claim().map(|c| c.from), Some(RIGHT));

    assert!(meld_from_string("m45+6").is_err()); // チーは上家からのみ
    assert!(meld_from_string("p555").is_err()); // ポンは鳴いた牌が必要
    assert!(meld_from_string("m124+").is_err());
    assert!(meld_from_string("+m1").is_err());
    assert!(meld_from_string("m1+1+1").is_err());
}
