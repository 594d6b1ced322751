use anyhow::{Result, ensure};
use svec::{SimpleVector, reserve};

use crate::time;
use crate::utils::arg_or;

pub fn reserve_constructor(_args: &[Option<&str>]) -> Result<()> {
    let v = SimpleVector::<i32>::with_reserve(reserve(5))?;
    ensure!(v.capacity() == 5, "capacity is {}", v.capacity());
    ensure!(v.is_empty());
    println!("reserve-ctor: done");
    Ok(())
}

pub fn reserve_method(_args: &[Option<&str>]) -> Result<()> {
    let mut v = SimpleVector::<i32>::new();
    v.reserve(5)?;
    ensure!(v.capacity() == 5);
    ensure!(v.is_empty());

    v.reserve(1)?;
    ensure!(v.capacity() == 5, "reserve(1) shrank the capacity");
    for i in 0..10 {
        v.push_back(i)?;
    }
    ensure!(v.len() == 10);
    v.reserve(100)?;
    ensure!(v.len() == 10);
    ensure!(v.capacity() == 100);
    for (i, &x) in v.iter().enumerate() {
        ensure!(x == i as i32, "v[{i}] is {x}");
    }
    println!("reserve-method: done");
    Ok(())
}

/// Prints every capacity change while pushing `count` elements (default 100).
pub fn growth(args: &[Option<&str>]) -> Result<()> {
    let count: usize = arg_or(args, 0, 100)?;
    let mut v = SimpleVector::new();
    let mut last = v.capacity();
    for i in 0..count {
        v.push_back(i)?;
        if v.capacity() != last {
            println!("size {:>8} capacity {:>8} -> {:>8}", v.len(), last, v.capacity());
            last = v.capacity();
        }
    }
    Ok(())
}

/// Times `count` pushes (default 10M) into a fresh vector and into one reserved up
/// front, then a batch of random inserts and erases.
pub fn push_bench(args: &[Option<&str>]) -> Result<()> {
    let count: usize = arg_or(args, 0, 10_000_000)?;

    let grown = time!(push_n(SimpleVector::new(), count))?;
    let reserved = time!(push_n(SimpleVector::with_capacity(count)?, count))?;
    ensure!(grown == reserved);
    println!(
        "grown capacity {}, reserved capacity {}",
        grown.capacity(),
        reserved.capacity()
    );

    let mut v = reserved;
    v.truncate(count.min(100_000));
    let mut rng = fastrand::Rng::with_seed(count as u64);
    time!({
        for _ in 0..1000 {
            let pos = rng.usize(0..=v.len());
            v.insert(pos, rng.u64(..))?;
            let pos = rng.usize(0..v.len());
            v.erase(pos);
        }
    });
    println!("final size {}", v.len());
    Ok(())
}

fn push_n(mut v: SimpleVector<u64>, count: usize) -> Result<SimpleVector<u64>> {
    for i in 0..count as u64 {
        v.push_back(i)?;
    }
    Ok(v)
}
