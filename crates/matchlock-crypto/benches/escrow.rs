use std::collections::HashMap;

use matchlock_core::{merge_encrypted_maps, EncryptedData, EncryptedMap, Record};
use matchlock_crypto::{decrypt, encrypt, OcKeyMap, OcKeypair};

const PASS: [u8; 32] = [0x77; 32];

fn oc_setup(n: usize) -> (OcKeyMap, HashMap<String, OcKeypair>) {
    let mut keys = OcKeyMap::new();
    let mut pairs = HashMap::new();
    for i in 0..n {
        let id = format!("oc{i}");
        let kp = OcKeypair::generate();
        keys.insert(id.clone(), kp.public.clone());
        pairs.insert(id, kp);
    }
    (keys, pairs)
}

fn matched_bucket(users: usize, keys: &OcKeyMap) -> Vec<EncryptedData> {
    let rand_id = vec![0x42u8; 32];
    let mut map = EncryptedMap::new();
    for i in 0..users {
        let outcome = encrypt(
            &[rand_id.clone()],
            &Record::new("perp", format!("user-{i}")),
            keys,
            &PASS,
        );
        merge_encrypted_maps(&mut map, outcome.encrypted);
    }
    map.into_values().next().unwrap().remove("oc0").unwrap()
}

#[divan::bench(args = [1, 4])]
fn bench_encrypt_submission(bencher: divan::Bencher, ocs: usize) {
    let (keys, _) = oc_setup(ocs);
    let rand_ids = vec![vec![0x42u8; 32]];
    let record = Record::new("perp", "user-1");
    bencher.bench(|| {
        encrypt(
            divan::black_box(&rand_ids),
            divan::black_box(&record),
            divan::black_box(&keys),
            &PASS,
        )
    });
}

#[divan::bench(args = [2, 8])]
fn bench_decrypt_bucket(bencher: divan::Bencher, users: usize) {
    let (keys, pairs) = oc_setup(1);
    let entries = matched_bucket(users, &keys);
    bencher.bench(|| decrypt(divan::black_box(&entries), &pairs["oc0"]));
}

fn main() {
    divan::main();
}
