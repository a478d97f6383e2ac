mod common;
use common::*;

#[test]
fn test_numeric_array() {
    let mut r = runtime();
    exec(&mut r, "DIM a(3,3):a(2,3)=7:a(3,2)=8");
    assert_eq!(exec(&mut r, "PRINT a(2,3);a(3,2);a(1,1)"), "780\n");
}

#[test]
fn test_array_bounds() {
    let mut r = runtime();
    exec(&mut r, "DIM a(3,3)");
    assert_eq!(exec(&mut r, "PRINT a(4,1)"), "?BAD ARRAY INDEX\n");
    assert_eq!(exec(&mut r, "PRINT a(0,1)"), "?BAD ARRAY INDEX\n");
    assert_eq!(exec(&mut r, "PRINT a(1)"), "?WRONG ARRAY DIMS\n");
    assert_eq!(exec(&mut r, "a(1,2,3)=1"), "?WRONG ARRAY DIMS\n");
    assert_eq!(exec(&mut r, "PRINT b(1)"), "?VARIABLE NOT FOUND\n");
    assert_eq!(exec(&mut r, "DIM c(0)"), "?BAD ARRAY INDEX\n");
}

#[test]
fn test_string_array() {
    let mut r = runtime();
    exec(&mut r, "DIM s$(3):s$(2)=\"TWO\":s$(1)=\"ONE\":s$(3)=\"3\"");
    assert_eq!(exec(&mut r, "PRINT s$(1);s$(2);s$(3)"), "ONETWO3\n");
    exec(&mut r, "s$(2)=\"\":s$(1)=\"UNO\"");
    assert_eq!(exec(&mut r, "PRINT s$(1);\"|\";s$(2);\"|\";s$(3)"), "UNO||3\n");
}

#[test]
fn test_redim_replaces() {
    let mut r = runtime();
    exec(&mut r, "DIM a(2):a(1)=5:DIM a(4)");
    assert_eq!(exec(&mut r, "PRINT a(1);a(4)"), "00\n");
}

#[test]
fn test_arrays_and_scalars_are_separate() {
    let mut r = runtime();
    exec(&mut r, "a=1:DIM a(2):a(1)=2");
    assert_eq!(exec(&mut r, "PRINT a;a(1)"), "12\n");
}

#[test]
fn test_array_in_loop() {
    let mut r = runtime();
    exec_all(
        &mut r,
        &[
            "10 DIM f(10)",
            "20 f(1)=1:f(2)=1",
            "30 FOR i=3 TO 10:f(i)=f(i-1)+f(i-2):NEXT i",
            "40 PRINT f(10)",
        ],
    );
    assert_eq!(exec(&mut r, "RUN"), "55\n");
}
